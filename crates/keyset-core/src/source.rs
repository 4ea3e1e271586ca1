//! The data-source seam.
//!
//! The paginator never talks to storage directly. A [`DataSource`] counts the
//! documents matching a caller-supplied filter and runs the paginated fetch:
//! caller filter, then the seek predicate, then sort, skip and limit.

use std::future::Future;

use crate::predicate::Predicate;
use crate::sort::SortSpec;

/// Parameters of a single paginated fetch.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery<'a, F> {
   /// Caller-supplied filter (the opaque pipeline prefix).
   pub filter: &'a F,
   /// Seek condition derived from the cursor.
   pub range: &'a Predicate,
   /// Sort order to scan in; reversed for backward pages.
   pub sort: &'a SortSpec,
   /// Rows to skip after filtering and sorting.
   ///
   /// Skipping happens after the sort, like SQL `OFFSET`, so the skipped rows
   /// are the first `skip` in `sort` order past the cursor, not an arbitrary
   /// unsorted prefix.
   pub skip: u64,
   /// Maximum rows to return, including the overfetch probe row.
   pub limit: usize,
}

/// A store the paginator can count and fetch documents from.
pub trait DataSource {
   type Document;
   /// Caller-defined filter stage; opaque to the paginator.
   type Filter;
   /// Store error, returned from `paginate` unchanged.
   type Error;

   /// Count documents matching `filter`, ignoring any pagination.
   fn count(&self, filter: &Self::Filter) -> impl Future<Output = Result<u64, Self::Error>> + Send;

   /// Fetch documents for `query`, ordered by `query.sort`.
   fn fetch(
      &self,
      query: PageQuery<'_, Self::Filter>,
   ) -> impl Future<Output = Result<Vec<Self::Document>, Self::Error>> + Send;
}
