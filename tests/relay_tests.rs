//! End-to-end page requests through the JSON command and both data sources.
#![cfg(feature = "sqlite")]

use indexmap::IndexMap;
use relay_keyset::sqlite::{SqlFilter, SqliteSource};
use relay_keyset::{
   Connection, MemorySource, PageRequest, Paginator, PaginatorConfig, Predicate, SortField, SortSpec,
   fetch_page,
};
use serde_json::{Value as JsonValue, json};
use tempfile::TempDir;

fn init_tracing() {
   let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// ```text
/// id | name  | team | points
/// ---|-------|------|-------
///  1 | ada   | red  | 30
///  2 | bob   | blue | 10
///  3 | cy    | red  | 20
///  4 | dee   | blue | 30
///  5 | eve   | red  | 10
///  6 | fay   | blue | 20
/// ```
fn players() -> Vec<IndexMap<String, JsonValue>> {
   [
      (1, "ada", "red", 30),
      (2, "bob", "blue", 10),
      (3, "cy", "red", 20),
      (4, "dee", "blue", 30),
      (5, "eve", "red", 10),
      (6, "fay", "blue", 20),
   ]
   .into_iter()
   .map(|(id, name, team, points)| {
      IndexMap::from([
         ("id".to_string(), json!(id)),
         ("name".to_string(), json!(name)),
         ("team".to_string(), json!(team)),
         ("points".to_string(), json!(points)),
      ])
   })
   .collect()
}

async fn sqlite_players() -> (SqliteSource, TempDir) {
   let temp_dir = TempDir::new().expect("Failed to create temp directory");
   let source = SqliteSource::connect(temp_dir.path().join("players.db"), None)
      .await
      .expect("Failed to connect to test database");

   source
      .execute(
         "CREATE TABLE players (id INTEGER PRIMARY KEY, name TEXT NOT NULL, team TEXT NOT NULL, points INTEGER NOT NULL)",
         vec![],
      )
      .await
      .unwrap();

   for player in players() {
      source
         .execute(
            "INSERT INTO players (id, name, team, points) VALUES ($1, $2, $3, $4)",
            player.into_values().collect(),
         )
         .await
         .unwrap();
   }

   (source, temp_dir)
}

fn ids(page: &Connection<IndexMap<String, JsonValue>>) -> Vec<i64> {
   page.nodes().map(|node| node["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn json_command_walks_sqlite_forward() {
   init_tracing();
   let (source, _temp) = sqlite_players().await;
   let paginator = Paginator::default();

   let mut seen = Vec::new();
   let mut after = JsonValue::Null;
   loop {
      let page = fetch_page(
         &paginator,
         &source,
         json!({
            "filter": { "query": "SELECT * FROM players WHERE team = $1", "values": ["red"] },
            "first": 2,
            "after": after,
            "sort": { "points": -1 },
         }),
      )
      .await
      .unwrap();

      assert_eq!(page["pageInfo"]["totalCount"], json!(3));
      for edge in page["edges"].as_array().unwrap() {
         seen.push(edge["node"]["id"].as_i64().unwrap());
      }

      if page["pageInfo"]["hasNextPage"] == json!(false) {
         break;
      }
      after = page["pageInfo"]["endCursor"].clone();
   }

   assert_eq!(seen, vec![1, 3, 5]);
}

#[tokio::test]
async fn json_output_has_relay_shape() {
   init_tracing();
   let (source, _temp) = sqlite_players().await;

   let page = fetch_page(
      &Paginator::default(),
      &source,
      json!({ "filter": { "query": "SELECT id, name FROM players" }, "last": 2 }),
   )
   .await
   .unwrap();

   let mut keys: Vec<&String> = page.as_object().unwrap().keys().collect();
   keys.sort();
   assert_eq!(keys, vec!["edges", "pageInfo"]);

   let mut info_keys: Vec<&String> = page["pageInfo"].as_object().unwrap().keys().collect();
   info_keys.sort();
   assert_eq!(
      info_keys,
      vec!["count", "endCursor", "hasNextPage", "hasPreviousPage", "startCursor", "totalCount"]
   );

   assert_eq!(page["edges"][0]["node"], json!({ "id": 5, "name": "eve" }));
   assert_eq!(page["edges"][1]["node"], json!({ "id": 6, "name": "fay" }));
   assert_eq!(page["edges"][0]["cursor"], page["pageInfo"]["startCursor"]);
   assert_eq!(page["edges"][1]["cursor"], page["pageInfo"]["endCursor"]);
   assert_eq!(page["pageInfo"]["hasPreviousPage"], json!(true));
   assert_eq!(page["pageInfo"]["hasNextPage"], json!(false));
}

#[tokio::test]
async fn json_command_reports_sqlite_errors_as_code_and_message() {
   init_tracing();
   let (source, _temp) = sqlite_players().await;

   let err = fetch_page(
      &Paginator::default(),
      &source,
      json!({ "filter": { "query": "SELECT * FROM players LIMIT 3" }, "first": 2 }),
   )
   .await
   .unwrap_err();

   let value = serde_json::to_value(&err).unwrap();
   assert_eq!(value["code"], json!("INVALID_PAGINATION_QUERY"));
   assert!(value["message"].as_str().unwrap().contains("LIMIT"));
}

#[tokio::test]
async fn memory_and_sqlite_sources_agree() {
   init_tracing();
   let (sqlite, _temp) = sqlite_players().await;
   let memory = MemorySource::new(players());
   let paginator = Paginator::default();
   let filter = SqlFilter::new("SELECT * FROM players");

   let sorts = [
      SortSpec::new(vec![SortField::asc("points")]),
      SortSpec::new(vec![SortField::desc("points")]),
      SortSpec::new(vec![SortField::asc("team"), SortField::desc("points")]),
      SortSpec::new(vec![SortField::desc("name")]),
   ];

   for sort in sorts {
      for backward in [false, true] {
         let request = if backward {
            PageRequest::new().last(4).sort(sort.clone())
         } else {
            PageRequest::new().first(4).sort(sort.clone())
         };

         let from_sqlite = paginator.paginate(&sqlite, &filter, &request).await.unwrap();
         let from_memory = paginator
            .paginate(&memory, &Predicate::Always, &request)
            .await
            .unwrap();

         assert_eq!(ids(&from_sqlite), ids(&from_memory), "sort {sort:?}, backward {backward}");
         assert_eq!(from_sqlite.page_info, from_memory.page_info);
      }
   }
}

#[tokio::test]
async fn cursors_are_portable_between_sources() {
   init_tracing();
   let (sqlite, _temp) = sqlite_players().await;
   let memory = MemorySource::new(players());
   let paginator = Paginator::default();
   let sort = SortSpec::new(vec![SortField::desc("points")]);

   let first = paginator
      .paginate(&memory, &Predicate::Always, &PageRequest::new().first(3).sort(sort.clone()))
      .await
      .unwrap();
   assert_eq!(ids(&first), vec![1, 4, 3]);

   let request = PageRequest::new()
      .first(3)
      .after(first.page_info.end_cursor.clone().unwrap())
      .sort(sort);
   let second = paginator
      .paginate(&sqlite, &SqlFilter::new("SELECT * FROM players"), &request)
      .await
      .unwrap();
   assert_eq!(ids(&second), vec![6, 2, 5]);
   assert!(!second.page_info.has_next_page);
}

#[tokio::test]
async fn configured_default_and_max_page_size() {
   init_tracing();
   let (source, _temp) = sqlite_players().await;
   let paginator = Paginator::new(PaginatorConfig {
      default_page_size: Some(4),
      max_page_size: Some(5),
      ..Default::default()
   });
   let filter = SqlFilter::new("SELECT * FROM players");

   let page = paginator.paginate(&source, &filter, &PageRequest::new()).await.unwrap();
   assert_eq!(page.page_info.count, 4);

   let page = paginator
      .paginate(&source, &filter, &PageRequest::new().first(100))
      .await
      .unwrap();
   assert_eq!(page.page_info.count, 5);
   assert!(page.page_info.has_next_page);
}
