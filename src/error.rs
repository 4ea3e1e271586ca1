use serde::{Serialize, Serializer};

/// Result type alias for page commands.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by the JSON page commands.
///
/// Serializes as `{ "code": ..., "message": ... }` so it can be handed back to
/// an API caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Pagination-core error (bad cursor, missing limit, ...).
   #[error(transparent)]
   Keyset(#[from] keyset_core::Error),

   /// Error from the SQLite data source.
   #[cfg(feature = "sqlite")]
   #[error(transparent)]
   Sqlite(#[from] keyset_sqlite::Error),

   /// Command arguments could not be parsed, or the page could not be encoded.
   #[error("invalid json: {0}")]
   Json(#[from] serde_json::Error),
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Keyset(e) => e.error_code(),
         #[cfg(feature = "sqlite")]
         Error::Sqlite(e) => e.error_code(),
         Error::Json(_) => "INVALID_JSON".to_string(),
      }
   }
}

impl Serialize for Error {
   fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
   where
      S: Serializer,
   {
      use serde::ser::SerializeStruct;

      let mut state = serializer.serialize_struct("Error", 2)?;
      state.serialize_field("code", &self.error_code())?;
      state.serialize_field("message", &self.to_string())?;
      state.end()
   }
}
