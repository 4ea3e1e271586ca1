//! # keyset-sqlite
//!
//! SQLite [`DataSource`](keyset_core::DataSource) for keyset pagination, built on SQLx.
//!
//! The caller supplies a filter as a plain `SELECT` with `$N` placeholders. Pagination
//! wraps it as a subquery, appends the seek condition, `ORDER BY`, `LIMIT` and
//! `OFFSET`, and decodes rows to JSON objects keyed by column name.
//!
//! ## Example
//!
//! ```no_run
//! use keyset_core::{PageRequest, Paginator, SortField};
//! use keyset_sqlite::{SqlFilter, SqliteSource};
//!
//! # async fn example() -> Result<(), keyset_sqlite::Error> {
//! let source = SqliteSource::connect("posts.db", None).await?;
//!
//! let filter = SqlFilter::new("SELECT id, title, score FROM posts WHERE category = $1")
//!    .bind("rust");
//! let request = PageRequest::new()
//!    .first(20)
//!    .sort(vec![SortField::desc("score")]);
//!
//! let page = Paginator::default().paginate(&source, &filter, &request).await?;
//! println!("{} of {}", page.page_info.count, page.page_info.total_count);
//! # Ok(())
//! # }
//! ```

mod config;
mod decode;
mod error;
mod source;
mod sql;

pub use config::SqliteSourceConfig;
pub use decode::SqliteDocument;
pub use error::{Error, Result};
pub use source::SqliteSource;
pub use sql::SqlFilter;
