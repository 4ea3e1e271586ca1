//! Pagination requests and their normalisation.
//!
//! Callers speak Relay: `first`/`after` to page forward, `last`/`before` to
//! page backward. [`normalize`] reduces those four arguments to a single
//! `(limit, cursor, sort, backward)` form the paginator can execute with one
//! code path.
//!
//! # Direction rules
//!
//! - Supplying both `after` and `before` is rejected (`ConflictingCursors`).
//! - The request is backward only when it carries `last` or `before` and
//!   carries neither `first` nor `after`. Any mix of forward and backward
//!   arguments resolves forward.
//! - `limit = first ?? last ?? config.default_page_size`, else `MissingLimit`.
//! - `cursor = after ?? before`.
//!
//! # Sort handling
//!
//! The configured tie-breaker is appended (ascending) to the caller's spec
//! first; the result is the *cursor sort*, against which every cursor is
//! encoded and decoded. For backward requests the *query sort* is the cursor
//! sort with all directions reversed, so the data source scans from the far
//! end; the paginator restores caller order afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PaginatorConfig;
use crate::cursor::{Cursor, Position};
use crate::error::{Error, Result};
use crate::sort::{SortField, SortSpec};

/// Caller-facing pagination arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
   /// Number of items to fetch (forward pagination).
   pub first: Option<usize>,
   /// Cursor to start after (forward pagination).
   pub after: Option<Cursor>,
   /// Number of items to fetch (backward pagination).
   pub last: Option<usize>,
   /// Cursor to end before (backward pagination).
   pub before: Option<Cursor>,
   /// Number of items to skip past the cursor.
   pub skip: Option<u64>,
   /// Caller ordering. The tie-breaker field is appended if absent.
   pub sort: Option<SortSpec>,
}

impl PageRequest {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn first(mut self, n: usize) -> Self {
      self.first = Some(n);
      self
   }

   pub fn after(mut self, cursor: impl Into<Cursor>) -> Self {
      self.after = Some(cursor.into());
      self
   }

   pub fn last(mut self, n: usize) -> Self {
      self.last = Some(n);
      self
   }

   pub fn before(mut self, cursor: impl Into<Cursor>) -> Self {
      self.before = Some(cursor.into());
      self
   }

   pub fn skip(mut self, n: u64) -> Self {
      self.skip = Some(n);
      self
   }

   pub fn sort(mut self, sort: impl Into<SortSpec>) -> Self {
      self.sort = Some(sort.into());
      self
   }

   /// Whether the request pages backward under the direction rules.
   pub fn is_backward(&self) -> bool {
      let forward_args = self.first.is_some() || self.after.is_some();
      let backward_args = self.last.is_some() || self.before.is_some();
      backward_args && !forward_args
   }
}

/// A request reduced to a single execution form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
   /// Number of visible items requested.
   pub limit: usize,
   /// Decoded position of `after` / `before`.
   pub cursor: Option<Position>,
   /// Sort handed to the data source (reversed when backward).
   pub query_sort: SortSpec,
   /// Caller sort plus tie-breaker; cursors are always built against this.
   pub cursor_sort: SortSpec,
   pub backward: bool,
   pub skip: u64,
   /// `after` was supplied.
   pub has_after: bool,
   /// `before` was supplied.
   pub has_before: bool,
}

/// Append the tie-breaker so the spec defines a total order.
pub fn with_tie_breaker(sort: Option<&SortSpec>, tie_breaker: &str) -> Result<SortSpec> {
   let mut spec = sort.cloned().unwrap_or_default();
   if !tie_breaker.is_empty() {
      spec.push(SortField::asc(tie_breaker));
   }

   if spec.is_empty() {
      return Err(Error::EmptySortSpec);
   }

   Ok(spec)
}

/// Reduce a request to `(limit, cursor, sort, backward)`.
pub fn normalize(request: &PageRequest, config: &PaginatorConfig) -> Result<NormalizedRequest> {
   if request.after.is_some() && request.before.is_some() {
      return Err(Error::ConflictingCursors);
   }

   let backward = request.is_backward();

   let mut limit = request
      .first
      .or(request.last)
      .or(config.default_page_size)
      .ok_or(Error::MissingLimit)?;
   if limit == 0 {
      return Err(Error::InvalidPageSize);
   }
   if let Some(max) = config.max_page_size {
      limit = limit.min(max);
   }

   let cursor_sort = with_tie_breaker(request.sort.as_ref(), &config.tie_breaker)?;

   let cursor = match request.after.as_ref().or(request.before.as_ref()) {
      Some(cursor) => {
         let position = cursor.decode()?;
         position.validate_against(&cursor_sort)?;
         Some(position)
      }
      None => None,
   };

   let query_sort = if backward {
      cursor_sort.reversed()
   } else {
      cursor_sort.clone()
   };

   debug!(
      limit,
      backward,
      has_cursor = cursor.is_some(),
      sort_fields = cursor_sort.len(),
      "normalized pagination request"
   );

   Ok(NormalizedRequest {
      limit,
      cursor,
      query_sort,
      cursor_sort,
      backward,
      skip: request.skip.unwrap_or(0),
      has_after: request.after.is_some(),
      has_before: request.before.is_some(),
   })
}
