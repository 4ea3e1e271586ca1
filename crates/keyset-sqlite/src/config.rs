//! Configuration for the SQLite connection pool

use std::time::Duration;

/// Configuration for [`SqliteSource`](crate::SqliteSource) connection pools
///
/// # Examples
///
/// ```
/// use keyset_sqlite::SqliteSourceConfig;
///
/// // Use defaults
/// let config = SqliteSourceConfig::default();
///
/// // Override just one field
/// let config = SqliteSourceConfig {
///     max_connections: 3,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SqliteSourceConfig {
   /// Maximum number of pooled connections
   ///
   /// Each page request runs its count and data queries concurrently, so two
   /// connections per in-flight request avoids queueing.
   ///
   /// Default: 6
   pub max_connections: u32,

   /// Idle timeout for pooled connections
   ///
   /// Connections that remain idle for this duration will be closed automatically.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,

   /// Create the database file if it does not exist
   ///
   /// Default: true
   pub create_if_missing: bool,
}

impl Default for SqliteSourceConfig {
   fn default() -> Self {
      Self {
         max_connections: 6,
         idle_timeout: Duration::from_secs(30),
         create_if_missing: true,
      }
   }
}
