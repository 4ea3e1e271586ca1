//! # keyset-core
//!
//! Storage-agnostic keyset (cursor) pagination producing Relay connections.
//!
//! ## Core Types
//!
//! - **[`Paginator`]**: Runs a page request against a [`DataSource`]
//! - **[`PageRequest`]**: Relay arguments (`first`/`after`, `last`/`before`) plus `skip` and `sort`
//! - **[`Cursor`]**: Opaque, URL-safe token encoding a document's [`Position`]
//! - **[`Predicate`]**: Filter condition; [`seek_predicate`] builds the keyset "after" condition
//! - **[`Connection`]**: Edges plus [`PageInfo`], serialising to the Relay shape
//! - **[`MemorySource`]**: In-memory [`DataSource`] for small collections and tests
//!
//! ## Example
//!
//! ```
//! use keyset_core::{MemorySource, PageRequest, Paginator, Predicate, SortField};
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let source = MemorySource::new((1..=5).map(|id| json!({ "id": id })).collect());
//!
//! let page = Paginator::default()
//!    .paginate(&source, &Predicate::Always, &PageRequest::new().first(3))
//!    .await?;
//! assert!(page.page_info.has_next_page);
//!
//! let next = PageRequest::new()
//!    .first(3)
//!    .after(page.page_info.end_cursor.clone().unwrap())
//!    .sort(vec![SortField::asc("id")]);
//! let page = Paginator::default().paginate(&source, &Predicate::Always, &next).await?;
//! assert_eq!(page.edges.len(), 2);
//! assert!(!page.page_info.has_next_page);
//! # Ok::<(), keyset_core::Error>(())
//! # }).unwrap();
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod config;
mod connection;
mod cursor;
mod error;
mod memory;
mod paginator;
mod predicate;
mod request;
mod sort;
mod source;
mod value;

pub use config::PaginatorConfig;
pub use connection::{Connection, Edge, PageInfo};
pub use cursor::{Cursor, Position};
pub use error::{Error, Result};
pub use memory::MemorySource;
pub use paginator::{Paginator, paginate};
pub use predicate::{Comparison, Predicate, seek_predicate};
pub use request::{NormalizedRequest, PageRequest, normalize, with_tie_breaker};
pub use sort::{SortDirection, SortField, SortSpec};
pub use source::{DataSource, PageQuery};
pub use value::{Document, FieldValue};
