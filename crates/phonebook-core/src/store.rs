//! The `PersonStore` and `QueryExecutor` traits.
//!
//! Both are implemented by storage backends (e.g. `phonebook-store-sqlite`).
//! The API layer depends on these abstractions, not on a concrete backend.
//! They carry separate error types so that a failed model-generated query
//! can be told apart from a failure of the CRUD plumbing.

use std::future::Future;

use uuid::Uuid;

use crate::{
  person::Person,
  query::{Row, SqlTranslation},
};

/// Single-table CRUD over person records.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a person, or overwrite the name if the id already exists.
  fn add_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Rename an existing person. Returns `None` if the id is unknown, in
  /// which case nothing is written.
  fn rename_person(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Physically delete a person. Returns `false` if the id is unknown.
  fn remove_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;
}

/// A failed query, classified by where the fault lies.
pub trait QueryFailure: std::error::Error + Send + Sync + 'static {
  /// `true` when the store itself failed (for instance its connection is
  /// gone) rather than the statement being rejected or failing to run.
  fn is_store_failure(&self) -> bool;
}

/// Executes untrusted, model-generated SQL templates.
///
/// Implementations must bind parameters through the driver, refuse
/// statements that would modify the database, and roll back the enclosing
/// transaction on any failure. An empty result is `Ok(vec![])`.
pub trait QueryExecutor: Send + Sync {
  type Error: QueryFailure;

  fn execute<'a>(
    &'a self,
    translation: &'a SqlTranslation,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + 'a;
}
