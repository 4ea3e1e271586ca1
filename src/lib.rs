//! # relay-keyset
//!
//! Relay-style keyset (cursor) pagination over sorted document streams.
//!
//! This crate bundles the storage-agnostic core ([`keyset_core`]) with the
//! SQLite data source ([`sqlite`], behind the default `sqlite` feature) and a
//! JSON entry point, [`fetch_page`], for serving page requests straight from
//! API arguments.
//!
//! ```no_run
//! use relay_keyset::sqlite::{SqlFilter, SqliteSource};
//! use relay_keyset::{PageRequest, Paginator, SortField};
//!
//! # async fn example() -> Result<(), relay_keyset::Error> {
//! let source = SqliteSource::connect("posts.db", None).await?;
//! let filter = SqlFilter::new("SELECT id, title, score FROM posts");
//!
//! let page = Paginator::default()
//!    .paginate(&source, &filter, &PageRequest::new().first(10).sort(vec![SortField::desc("score")]))
//!    .await?;
//!
//! for edge in &page.edges {
//!    println!("{} {}", edge.cursor, edge.node["title"]);
//! }
//! # Ok(())
//! # }
//! ```

mod commands;
mod error;

pub use commands::{FetchPageArgs, fetch_page};
pub use error::{Error, Result};

pub use keyset_core::{
   Comparison, Connection, Cursor, DataSource, Document, Edge, FieldValue, MemorySource,
   PageInfo, PageQuery, PageRequest, PaginatorConfig, Paginator, Position, Predicate, SortDirection,
   SortField, SortSpec, paginate, seek_predicate,
};

/// SQLite data source.
#[cfg(feature = "sqlite")]
pub mod sqlite {
   pub use keyset_sqlite::{Error, SqlFilter, SqliteDocument, SqliteSource, SqliteSourceConfig};
}
