/// Result type alias for SQLite data source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the SQLite data source.
///
/// Pagination-core errors (malformed cursor, missing limit, ...) are wrapped
/// transparently so `paginate` can return a single error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the pagination core.
   #[error(transparent)]
   Keyset(#[from] keyset_core::Error),

   /// I/O error when accessing database files.
   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   /// SQLite type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// Column name contains invalid characters.
   ///
   /// Column names must match `[a-zA-Z_][a-zA-Z0-9_]*`.
   #[error("invalid column name '{name}': must match [a-zA-Z_][a-zA-Z0-9_]*")]
   InvalidColumnName { name: String },

   /// Filter query must not contain top-level ORDER BY, LIMIT or OFFSET clauses.
   #[error(
      "filter query must not contain top-level ORDER BY, LIMIT or OFFSET clauses (these are added automatically; subquery usage is fine)"
   )]
   InvalidPaginationQuery,
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::Keyset(e) => e.error_code(),
         Error::Io(_) => "IO_ERROR".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::InvalidColumnName { .. } => "INVALID_COLUMN_NAME".to_string(),
         Error::InvalidPaginationQuery => "INVALID_PAGINATION_QUERY".to_string(),
      }
   }
}
