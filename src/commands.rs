use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use keyset_core::{DataSource, Document, PageRequest, Paginator};

use crate::{Error, Result};

/// Arguments of a JSON page request.
///
/// The Relay arguments sit beside the filter:
///
/// ```json
/// { "filter": { ... }, "first": 10, "after": "eyJpZCI6...", "sort": { "score": -1 } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPageArgs<F> {
   pub filter: F,
   #[serde(flatten)]
   pub request: PageRequest,
}

/// Run one page request given as JSON and return the connection as JSON.
///
/// The shape of `filter` depends on the source: a `SqlFilter` for SQLite,
/// a `Predicate` for an in-memory source.
pub async fn fetch_page<S>(paginator: &Paginator, source: &S, args: JsonValue) -> Result<JsonValue>
where
   S: DataSource,
   S::Filter: DeserializeOwned,
   S::Document: Document + Serialize,
   S::Error: From<keyset_core::Error>,
   Error: From<S::Error>,
{
   let args: FetchPageArgs<S::Filter> = serde_json::from_value(args)?;
   debug!(
      first = ?args.request.first,
      last = ?args.request.last,
      backward = args.request.is_backward(),
      "fetch page command"
   );

   let connection = paginator.paginate(source, &args.filter, &args.request).await?;
   Ok(serde_json::to_value(&connection)?)
}

#[cfg(test)]
mod tests {
   use super::*;
   use keyset_core::MemorySource;
   use serde_json::json;

   fn source() -> MemorySource<JsonValue> {
      MemorySource::new(
         (1..=5)
            .map(|id| json!({ "id": id, "even": id % 2 == 0 }))
            .collect(),
      )
   }

   #[tokio::test]
   async fn fetch_page_round_trips_json() {
      let page = fetch_page(
         &Paginator::default(),
         &source(),
         json!({ "filter": "always", "first": 2, "sort": { "id": -1 } }),
      )
      .await
      .unwrap();

      let ids: Vec<i64> = page["edges"]
         .as_array()
         .unwrap()
         .iter()
         .map(|edge| edge["node"]["id"].as_i64().unwrap())
         .collect();
      assert_eq!(ids, vec![5, 4]);
      assert_eq!(page["pageInfo"]["hasNextPage"], json!(true));
      assert_eq!(page["pageInfo"]["totalCount"], json!(5));
   }

   #[tokio::test]
   async fn fetch_page_applies_sort_fields_in_given_order() {
      let source = MemorySource::new(vec![
         json!({ "id": 1, "score": 5, "alpha": "b" }),
         json!({ "id": 2, "score": 9, "alpha": "c" }),
         json!({ "id": 3, "score": 5, "alpha": "a" }),
      ]);

      // "score" before "alpha": not alphabetical
      let page = fetch_page(
         &Paginator::default(),
         &source,
         json!({ "filter": "always", "first": 3, "sort": { "score": -1, "alpha": 1 } }),
      )
      .await
      .unwrap();

      let ids: Vec<i64> = page["edges"]
         .as_array()
         .unwrap()
         .iter()
         .map(|edge| edge["node"]["id"].as_i64().unwrap())
         .collect();
      assert_eq!(ids, vec![2, 3, 1]);
   }

   #[tokio::test]
   async fn fetch_page_rejects_unparseable_args() {
      let err = fetch_page(&Paginator::default(), &source(), json!({ "first": 2 }))
         .await
         .unwrap_err();

      assert_eq!(err.error_code(), "INVALID_JSON");
   }

   #[tokio::test]
   async fn fetch_page_reports_core_errors() {
      let err = fetch_page(
         &Paginator::default(),
         &source(),
         json!({ "filter": "always", "first": 2, "after": "%%%" }),
      )
      .await
      .unwrap_err();

      assert_eq!(err.error_code(), "MALFORMED_CURSOR");
   }
}
