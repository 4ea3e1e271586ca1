/// Result type alias for keyset pagination operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised by the pagination core.
///
/// Data-source failures never appear here: `paginate` returns the source's own
/// error type and these variants convert into it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Cursor string is not valid base64/JSON, or does not carry every sort field.
   #[error("malformed cursor: {reason}")]
   MalformedCursor { reason: String },

   /// Neither `first` nor `last` was supplied and no default page size is configured.
   #[error("either 'first' or 'last' must be provided")]
   MissingLimit,

   /// Page size must be greater than zero.
   #[error("page size must be greater than zero")]
   InvalidPageSize,

   /// Cannot provide both `after` and `before` cursors.
   #[error("cannot provide both 'after' and 'before' cursors")]
   ConflictingCursors,

   /// A fetched document lacks a field named in the sort spec.
   #[error("sort field '{field}' not found in document")]
   MissingSortField { field: String },

   /// Sort spec has no fields and no tie-breaker could be appended.
   #[error("sort spec requires at least one field")]
   EmptySortSpec,
}

impl Error {
   pub(crate) fn malformed(reason: impl Into<String>) -> Self {
      Error::MalformedCursor {
         reason: reason.into(),
      }
   }

   /// Extract a structured error code from the error type.
   ///
   /// Callers map `MALFORMED_CURSOR` to an "invalid cursor" client response.
   pub fn error_code(&self) -> String {
      match self {
         Error::MalformedCursor { .. } => "MALFORMED_CURSOR".to_string(),
         Error::MissingLimit => "MISSING_LIMIT".to_string(),
         Error::InvalidPageSize => "INVALID_PAGE_SIZE".to_string(),
         Error::ConflictingCursors => "CONFLICTING_CURSORS".to_string(),
         Error::MissingSortField { .. } => "MISSING_SORT_FIELD".to_string(),
         Error::EmptySortSpec => "EMPTY_SORT_SPEC".to_string(),
      }
   }

   /// Whether the error was caused by caller input rather than stored data.
   pub fn is_client_error(&self) -> bool {
      !matches!(self, Error::MissingSortField { .. })
   }
}
