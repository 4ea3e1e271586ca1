//! Connection assembly.
//!
//! One call to [`Paginator::paginate`]:
//!
//! 1. normalises the request (direction, limit, cursor, sort),
//! 2. builds the seek predicate from the cursor,
//! 3. runs the total count and the `limit + 1` fetch concurrently,
//! 4. treats a returned `limit + 1`-th row as the "more data" signal and
//!    drops it,
//! 5. restores caller order for backward pages,
//! 6. encodes one cursor per edge against the caller's sort,
//! 7. fills in page info.

use tracing::debug;

use crate::config::PaginatorConfig;
use crate::connection::{Connection, Edge, PageInfo};
use crate::cursor::{Cursor, Position};
use crate::error::Error;
use crate::predicate::seek_predicate;
use crate::request::{NormalizedRequest, PageRequest, normalize};
use crate::source::{DataSource, PageQuery};
use crate::value::Document;

/// Executes Relay-style pagination against any [`DataSource`].
#[derive(Debug, Clone, Default)]
pub struct Paginator {
   config: PaginatorConfig,
}

impl Paginator {
   pub fn new(config: PaginatorConfig) -> Self {
      Self { config }
   }

   pub fn config(&self) -> &PaginatorConfig {
      &self.config
   }

   /// Produce one page of `source`, restricted to `filter`.
   ///
   /// Errors from the source are returned unchanged; core errors (malformed
   /// cursor, missing limit, ...) convert into the source's error type. No
   /// partial connection is ever returned.
   pub async fn paginate<S>(
      &self,
      source: &S,
      filter: &S::Filter,
      request: &PageRequest,
   ) -> Result<Connection<S::Document>, S::Error>
   where
      S: DataSource,
      S::Document: Document,
      S::Error: From<Error>,
   {
      let normalized = normalize(request, &self.config)?;
      let range = seek_predicate(&normalized.query_sort, normalized.cursor.as_ref())?;
      let fetch_limit = normalized.limit.checked_add(1).ok_or(Error::InvalidPageSize)?;

      let query = PageQuery {
         filter,
         range: &range,
         sort: &normalized.query_sort,
         skip: normalized.skip,
         limit: fetch_limit,
      };

      // try_join drops the other future as soon as one fails.
      let (total_count, documents) =
         tokio::try_join!(source.count(filter), source.fetch(query))?;

      let connection = assemble(documents, total_count, &normalized)?;

      debug!(
         count = connection.page_info.count,
         total_count,
         has_next_page = connection.page_info.has_next_page,
         has_previous_page = connection.page_info.has_previous_page,
         "assembled connection"
      );

      Ok(connection)
   }
}

/// Paginate with the default configuration.
pub async fn paginate<S>(
   source: &S,
   filter: &S::Filter,
   request: &PageRequest,
) -> Result<Connection<S::Document>, S::Error>
where
   S: DataSource,
   S::Document: Document,
   S::Error: From<Error>,
{
   Paginator::default().paginate(source, filter, request).await
}

/// Turn fetched rows into a connection.
///
/// `documents` is in query-sort order and may hold the overfetch probe row.
pub(crate) fn assemble<D: Document>(
   mut documents: Vec<D>,
   total_count: u64,
   request: &NormalizedRequest,
) -> Result<Connection<D>, Error> {
   let has_more = documents.len() > request.limit;
   if has_more {
      documents.truncate(request.limit);
   }

   // Backward pages were scanned in reversed sort order
   if request.backward {
      documents.reverse();
   }

   let mut edges = Vec::with_capacity(documents.len());
   for node in documents {
      let position = Position::from_document(&request.cursor_sort, &node)?;
      edges.push(Edge {
         cursor: Cursor::encode(&position)?,
         node,
      });
   }

   let (has_previous_page, has_next_page) = if request.backward {
      (has_more, request.has_before)
   } else {
      (request.has_after, has_more)
   };

   let page_info = PageInfo {
      count: edges.len(),
      total_count,
      start_cursor: edges.first().map(|e| e.cursor.clone()),
      end_cursor: edges.last().map(|e| e.cursor.clone()),
      has_previous_page,
      has_next_page,
   };

   Ok(Connection { edges, page_info })
}
