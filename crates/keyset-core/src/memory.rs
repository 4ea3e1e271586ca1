//! In-memory data source.
//!
//! Holds documents in a `Vec` and runs the paginated fetch by evaluating
//! predicates directly. Useful for tests and for paginating small,
//! already-loaded collections.

use crate::error::Error;
use crate::predicate::Predicate;
use crate::source::{DataSource, PageQuery};
use crate::value::Document;

/// A [`DataSource`] over an owned collection, filtered by a [`Predicate`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource<D> {
   documents: Vec<D>,
}

impl<D> MemorySource<D> {
   pub fn new(documents: Vec<D>) -> Self {
      Self { documents }
   }

   pub fn documents(&self) -> &[D] {
      &self.documents
   }
}

impl<D> DataSource for MemorySource<D>
where
   D: Document + Clone + Send + Sync,
{
   type Document = D;
   type Filter = Predicate;
   type Error = Error;

   async fn count(&self, filter: &Predicate) -> Result<u64, Error> {
      Ok(self.documents.iter().filter(|d| filter.matches(*d)).count() as u64)
   }

   async fn fetch(&self, query: PageQuery<'_, Predicate>) -> Result<Vec<D>, Error> {
      let mut matched: Vec<&D> = self
         .documents
         .iter()
         .filter(|d| query.filter.matches(*d) && query.range.matches(*d))
         .collect();

      matched.sort_by(|a, b| query.sort.compare(*a, *b));

      let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
      Ok(matched
         .into_iter()
         .skip(skip)
         .take(query.limit)
         .cloned()
         .collect())
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::sort::{SortField, SortSpec};
   use serde_json::{Value as JsonValue, json};

   fn ids(docs: &[JsonValue]) -> Vec<i64> {
      docs.iter().map(|d| d["id"].as_i64().unwrap()).collect()
   }

   #[tokio::test]
   async fn fetch_filters_sorts_skips_and_limits() {
      let source = MemorySource::new((1..=6).map(|id| json!({"id": id, "even": id % 2 == 0})).collect());
      let filter = Predicate::eq("even", true);
      let range = Predicate::Always;
      let sort = SortSpec::new(vec![SortField::desc("id")]);

      let docs = source
         .fetch(PageQuery {
            filter: &filter,
            range: &range,
            sort: &sort,
            skip: 1,
            limit: 5,
         })
         .await
         .unwrap();

      assert_eq!(ids(&docs), vec![4, 2]);
      assert_eq!(source.count(&filter).await.unwrap(), 3);
   }
}
