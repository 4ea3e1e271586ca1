//! Configuration for the paginator

/// Configuration for [`Paginator`](crate::Paginator) request normalisation
///
/// # Examples
///
/// ```
/// use keyset_core::PaginatorConfig;
///
/// // Use defaults
/// let config = PaginatorConfig::default();
///
/// // Override just one field
/// let config = PaginatorConfig {
///     default_page_size: Some(20),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PaginatorConfig {
   /// Unique field appended ascending to every sort spec that lacks it
   ///
   /// Keyset pagination needs a total order; without a unique trailing field,
   /// documents tied on every sort field could be skipped or repeated across
   /// pages.
   ///
   /// Default: `"id"`
   pub tie_breaker: String,

   /// Page size used when a request carries neither `first` nor `last`
   ///
   /// When `None`, such requests fail with `MissingLimit`.
   ///
   /// Default: `None`
   pub default_page_size: Option<usize>,

   /// Upper bound applied to `first` / `last`
   ///
   /// Larger requests are clamped rather than rejected.
   ///
   /// Default: `None` (unbounded)
   pub max_page_size: Option<usize>,
}

impl Default for PaginatorConfig {
   fn default() -> Self {
      Self {
         tie_breaker: "id".to_string(),
         default_page_size: None,
         max_page_size: None,
      }
   }
}
