//! SQLite-backed data source

use std::path::Path;

use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, trace};

use keyset_core::{DataSource, PageQuery};

use crate::config::SqliteSourceConfig;
use crate::decode::{SqliteDocument, bind_field, bind_json, decode_rows};
use crate::sql::{SqlFilter, build_count_query, build_page_query};
use crate::{Error, Result};

/// A [`DataSource`] over a SQLite connection pool.
///
/// The filter is a caller-written `SELECT` ([`SqlFilter`]). Both the count and
/// the page query wrap it as a subquery, so it may join, filter and project
/// freely but must not carry its own top-level `ORDER BY`, `LIMIT` or `OFFSET`.
#[derive(Debug, Clone)]
pub struct SqliteSource {
   pool: Pool<Sqlite>,
}

impl SqliteSource {
   /// Open a pool on the database file at `path`.
   pub async fn connect(path: impl AsRef<Path>, config: Option<SqliteSourceConfig>) -> Result<Self> {
      let config = config.unwrap_or_default();
      let path = path.as_ref();

      let options = SqliteConnectOptions::new()
         .filename(path)
         .create_if_missing(config.create_if_missing);

      let pool = SqlitePoolOptions::new()
         .max_connections(config.max_connections)
         .idle_timeout(config.idle_timeout)
         .connect_with(options)
         .await?;

      debug!(
         path = %path.display(),
         max_connections = config.max_connections,
         "opened sqlite source"
      );

      Ok(Self { pool })
   }

   /// Wrap an existing pool.
   pub fn from_pool(pool: Pool<Sqlite>) -> Self {
      Self { pool }
   }

   pub fn pool(&self) -> &Pool<Sqlite> {
      &self.pool
   }

   /// Execute a statement that returns no rows, such as schema setup or seeding.
   ///
   /// Returns the number of rows affected.
   pub async fn execute(&self, query: &str, values: Vec<JsonValue>) -> Result<u64> {
      let mut q = sqlx::query(query);
      for value in values {
         q = bind_json(q, value);
      }
      let result = q.execute(&self.pool).await?;
      Ok(result.rows_affected())
   }

   /// Run a caller-written query and decode every row.
   pub async fn fetch_all(&self, query: &str, values: Vec<JsonValue>) -> Result<Vec<SqliteDocument>> {
      let mut q = sqlx::query(query);
      for value in values {
         q = bind_json(q, value);
      }
      let rows = q.fetch_all(&self.pool).await?;
      decode_rows(rows)
   }

   /// Close every pooled connection.
   pub async fn close(&self) {
      self.pool.close().await;
   }
}

impl DataSource for SqliteSource {
   type Document = SqliteDocument;
   type Filter = SqlFilter;
   type Error = Error;

   async fn count(&self, filter: &SqlFilter) -> Result<u64> {
      let sql = build_count_query(filter)?;
      trace!(sql = %sql, "count query");

      let mut q = sqlx::query(&sql);
      for value in &filter.values {
         q = bind_json(q, value.clone());
      }
      let row = q.fetch_one(&self.pool).await?;
      let total: i64 = row.try_get(0)?;

      Ok(u64::try_from(total).unwrap_or_default())
   }

   async fn fetch(&self, query: PageQuery<'_, SqlFilter>) -> Result<Vec<SqliteDocument>> {
      let (sql, seek_values) =
         build_page_query(query.filter, query.range, query.sort, query.skip, query.limit)?;
      trace!(sql = %sql, binds = query.filter.values.len() + seek_values.len(), "page query");

      let mut q = sqlx::query(&sql);
      for value in &query.filter.values {
         q = bind_json(q, value.clone());
      }
      for value in seek_values {
         q = bind_field(q, value);
      }
      let rows = q.fetch_all(&self.pool).await?;

      decode_rows(rows)
   }
}
