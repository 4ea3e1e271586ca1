//! Relay connection types.
//!
//! Serialises to the shape GraphQL clients expect:
//!
//! ```text
//! { edges: [{ cursor, node }],
//!   pageInfo: { count, totalCount, startCursor, endCursor,
//!               hasPreviousPage, hasNextPage } }
//! ```

use serde::Serialize;

use crate::cursor::Cursor;

/// A page of results with edges and page info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
   pub edges: Vec<Edge<T>>,
   pub page_info: PageInfo,
}

/// A single item in a page.
#[derive(Debug, Clone, Serialize)]
pub struct Edge<T> {
   /// Cursor of this item under the caller's sort.
   pub cursor: Cursor,
   pub node: T,
}

/// Information about the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
   /// Number of edges in this page.
   pub count: usize,
   /// Number of documents matching the caller's filter, ignoring cursor and skip.
   pub total_count: u64,
   pub start_cursor: Option<Cursor>,
   pub end_cursor: Option<Cursor>,
   pub has_previous_page: bool,
   pub has_next_page: bool,
}

impl<T> Connection<T> {
   /// The nodes of this page, in order.
   pub fn nodes(&self) -> impl Iterator<Item = &T> {
      self.edges.iter().map(|e| &e.node)
   }

   /// Transform every node, keeping cursors and page info.
   pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
      Connection {
         edges: self
            .edges
            .into_iter()
            .map(|e| Edge {
               cursor: e.cursor,
               node: f(e.node),
            })
            .collect(),
         page_info: self.page_info,
      }
   }
}
