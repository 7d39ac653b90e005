//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::{Duration, Instant};

use phonebook_core::{
  person::Person,
  query::{SqlTranslation, SqlValue},
  store::{PersonStore, QueryExecutor, QueryFailure as _},
};
use uuid::Uuid;

use crate::{QueryError, QueryLimits, SqliteStore};

const COUNT_FOREVER: &str =
  "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT count(*) FROM c";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seed(s: &SqliteStore, name: &str) -> Person {
  s.add_person(Person { id: Uuid::new_v4(), name: name.into() })
    .await
    .unwrap()
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;
  let person = seed(&s, "Test User").await;

  let fetched = s.get_person(person.id).await.unwrap();
  assert_eq!(fetched, Some(person));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  let result = s.get_person(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn add_existing_id_overwrites_name() {
  let s = store().await;
  let person = seed(&s, "First").await;

  s.add_person(Person { id: person.id, name: "Second".into() })
    .await
    .unwrap();

  let fetched = s.get_person(person.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Second");
}

#[tokio::test]
async fn rename_person_updates_name() {
  let s = store().await;
  let person = seed(&s, "Original Name").await;

  let renamed = s
    .rename_person(person.id, "Updated Name".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(renamed.name, "Updated Name");

  let fetched = s.get_person(person.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Updated Name");
}

#[tokio::test]
async fn rename_missing_person_returns_none_and_writes_nothing() {
  let s = store().await;
  let existing = seed(&s, "Keep Me").await;
  let missing = Uuid::new_v4();

  let result = s.rename_person(missing, "Ghost".into()).await.unwrap();
  assert!(result.is_none());
  assert!(s.get_person(missing).await.unwrap().is_none());
  assert_eq!(s.get_person(existing.id).await.unwrap().unwrap().name, "Keep Me");
}

#[tokio::test]
async fn remove_person_deletes_row() {
  let s = store().await;
  let person = seed(&s, "Test User").await;

  assert!(s.remove_person(person.id).await.unwrap());
  assert!(s.get_person(person.id).await.unwrap().is_none());
  assert!(!s.remove_person(person.id).await.unwrap());
}

// ─── Query execution ─────────────────────────────────────────────────────────

#[tokio::test]
async fn execute_binds_named_parameter() {
  let s = store().await;
  let id: Uuid = "d59abfc4-3aae-4e29-875b-7b56e021ad42".parse().unwrap();
  s.add_person(Person { id, name: "Test User".into() }).await.unwrap();
  seed(&s, "Someone Else").await;

  let translation = SqlTranslation::new("SELECT name FROM people WHERE id = :person_id;")
    .with_param("person_id", "d59abfc4-3aae-4e29-875b-7b56e021ad42");
  let rows = s.execute(&translation).await.unwrap();

  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].len(), 1);
  assert_eq!(rows[0].get("name"), Some(&SqlValue::from("Test User")));
  assert_eq!(
    serde_json::to_value(&rows).unwrap(),
    serde_json::json!([{ "name": "Test User" }]),
  );
}

#[tokio::test]
async fn execute_preserves_column_order() {
  let s = store().await;
  let person = seed(&s, "Test User").await;

  let rows = s
    .execute(&SqlTranslation::new("SELECT name, id FROM people"))
    .await
    .unwrap();
  assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["name", "id"]);
  assert_eq!(rows[0].get("id"), Some(&SqlValue::Text(person.id.to_string())));
}

#[tokio::test]
async fn execute_preserves_row_order() {
  let s = store().await;
  seed(&s, "Charlie").await;
  seed(&s, "Alice").await;
  seed(&s, "Bob").await;

  let rows = s
    .execute(&SqlTranslation::new("SELECT name FROM people ORDER BY name DESC"))
    .await
    .unwrap();
  let names: Vec<_> = rows.iter().filter_map(|r| r.get("name")).cloned().collect();
  assert_eq!(
    names,
    vec![SqlValue::from("Charlie"), SqlValue::from("Bob"), SqlValue::from("Alice")],
  );
}

#[tokio::test]
async fn execute_without_params_succeeds() {
  let s = store().await;
  seed(&s, "A").await;
  seed(&s, "B").await;

  let rows = s
    .execute(&SqlTranslation::new("SELECT COUNT(*) AS total FROM people"))
    .await
    .unwrap();
  assert_eq!(rows[0].get("total"), Some(&SqlValue::Integer(2)));
}

#[tokio::test]
async fn execute_with_empty_params_succeeds() {
  let s = store().await;
  let mut translation = SqlTranslation::new("SELECT 1 AS one");
  translation.params = Some(Default::default());

  let rows = s.execute(&translation).await.unwrap();
  assert_eq!(rows[0].get("one"), Some(&SqlValue::Integer(1)));
}

#[tokio::test]
async fn execute_zero_rows_is_empty_not_error() {
  let s = store().await;
  let translation = SqlTranslation::new("SELECT name FROM people WHERE id = :id")
    .with_param("id", Uuid::new_v4().to_string());

  let rows = s.execute(&translation).await.unwrap();
  assert!(rows.is_empty());
}

#[tokio::test]
async fn execute_binds_value_literally() {
  let s = store().await;
  seed(&s, "Test User").await;

  // The parameter is bound as data, so the injection attempt matches nothing.
  let translation = SqlTranslation::new("SELECT name FROM people WHERE name = :name")
    .with_param("name", "x' OR '1'='1");
  let rows = s.execute(&translation).await.unwrap();
  assert!(rows.is_empty());
}

#[tokio::test]
async fn execute_ignores_unused_params() {
  let s = store().await;
  let translation = SqlTranslation::new("SELECT 1 AS one").with_param("unused", 5_i64);
  let rows = s.execute(&translation).await.unwrap();
  assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn execute_missing_param_errors() {
  let s = store().await;
  let err = s
    .execute(&SqlTranslation::new("SELECT name FROM people WHERE id = :person_id"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::MissingParameter(ref name) if name == ":person_id"));
}

#[tokio::test]
async fn execute_positional_param_errors() {
  let s = store().await;
  let err = s
    .execute(&SqlTranslation::new("SELECT name FROM people WHERE id = ?").with_param("1", "x"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::PositionalParameter(1)));
}

#[tokio::test]
async fn execute_malformed_sql_surfaces_sqlite_message() {
  let s = store().await;
  let err = s
    .execute(&SqlTranslation::new("SELECT nme FROM people"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::Sqlite(_)));
  assert!(err.to_string().contains("no such column"), "{err}");
}

#[tokio::test]
async fn execute_rejects_delete_and_keeps_rows() {
  let s = store().await;
  let person = seed(&s, "Test User").await;

  let err = s
    .execute(&SqlTranslation::new("DELETE FROM people"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::NotReadOnly));
  assert!(s.get_person(person.id).await.unwrap().is_some());
}

#[tokio::test]
async fn execute_rejects_write_hidden_behind_cte() {
  let s = store().await;
  let person = seed(&s, "Test User").await;

  let err = s
    .execute(&SqlTranslation::new(
      "WITH doomed AS (SELECT id FROM people) DELETE FROM people WHERE id IN doomed",
    ))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::NotReadOnly));
  assert!(s.get_person(person.id).await.unwrap().is_some());
}

#[tokio::test]
async fn execute_rejects_update_without_where() {
  let s = store().await;
  let person = seed(&s, "Test User").await;

  let err = s
    .execute(&SqlTranslation::new("UPDATE people SET name = :name").with_param("name", "Oops"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::NotReadOnly));
  assert_eq!(s.get_person(person.id).await.unwrap().unwrap().name, "Test User");
}

#[tokio::test]
async fn execute_rejects_empty_statement() {
  let s = store().await;
  let err = s.execute(&SqlTranslation::new("   ")).await.unwrap_err();
  assert!(matches!(err, QueryError::EmptyStatement));
}

#[tokio::test]
async fn failed_query_rolls_back_so_next_query_runs() {
  let s = store().await;
  seed(&s, "Test User").await;

  // Fails while stepping, after the transaction has begun.
  let err = s
    .execute(&SqlTranslation::new("SELECT json('{not json') AS boom"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::Sqlite(_)));

  // A dangling transaction would make this fail with "cannot start a
  // transaction within a transaction".
  let rows = s
    .execute(&SqlTranslation::new("SELECT name FROM people"))
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);

  // And plain CRUD writes still go through.
  seed(&s, "Another").await;
}

#[tokio::test]
async fn execute_rejects_trailing_statement_and_keeps_rows() {
  let s = store().await;
  seed(&s, "Test User").await;

  let err = s
    .execute(&SqlTranslation::new("SELECT name FROM people; DELETE FROM people"))
    .await
    .unwrap_err();
  assert!(matches!(err, QueryError::MultipleStatements));

  let rows = s.execute(&SqlTranslation::new("SELECT name FROM people")).await.unwrap();
  assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn execute_accepts_trailing_semicolon_and_comment() {
  let s = store().await;
  let rows = s
    .execute(&SqlTranslation::new("SELECT 1 AS one; -- done\n"))
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
}

// ─── Limits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn runaway_query_is_interrupted_while_lookups_still_answer() {
  let s = store().await.with_query_limits(QueryLimits {
    timeout:  Duration::from_millis(200),
    max_rows: 1_000,
  });
  let person = seed(&s, "Test User").await;

  let started = Instant::now();
  let runaway = tokio::spawn({
    let s = s.clone();
    async move { s.execute(&SqlTranslation::new(COUNT_FOREVER)).await }
  });
  tokio::time::sleep(Duration::from_millis(20)).await;

  let fetched = tokio::time::timeout(Duration::from_secs(5), s.get_person(person.id))
    .await
    .expect("lookup is not starved by the runaway query")
    .unwrap();
  assert_eq!(fetched, Some(person));

  let err = tokio::time::timeout(Duration::from_secs(5), runaway)
    .await
    .expect("runaway query is interrupted")
    .unwrap()
    .unwrap_err();
  assert!(matches!(err, QueryError::TimedOut(_)), "{err}");
  assert!(!err.is_store_failure());
  assert!(started.elapsed() < Duration::from_secs(5));

  // The deadline does not leak into the next query.
  let rows = s.execute(&SqlTranslation::new("SELECT name FROM people")).await.unwrap();
  assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn unbounded_result_is_capped() {
  let s = store().await.with_query_limits(QueryLimits {
    timeout:  Duration::from_secs(5),
    max_rows: 25,
  });

  let rows = s
    .execute(&SqlTranslation::new(
      "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT x FROM c",
    ))
    .await
    .unwrap();
  assert_eq!(rows.len(), 25);
  assert_eq!(rows[24].get("x"), Some(&SqlValue::Integer(25)));
}

#[tokio::test]
async fn default_limits_apply() {
  let s = store().await;
  assert_eq!(s.query_limits(), QueryLimits::default());
}

#[tokio::test]
async fn closed_connection_is_a_store_failure() {
  let s = store().await;
  s.clone().close().await.unwrap();

  let err = s.execute(&SqlTranslation::new("SELECT 1")).await.unwrap_err();
  assert!(matches!(err, QueryError::Connection(_)), "{err}");
  assert!(err.is_store_failure());
}
