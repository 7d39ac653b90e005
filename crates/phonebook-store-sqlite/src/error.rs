//! Error types for `phonebook-store-sqlite`.

use thiserror::Error;

/// Failures of the person CRUD operations.
#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),
}

/// Failures while executing a model-generated query. Every one of these has
/// already rolled back its transaction by the time it is returned.
#[derive(Debug, Error)]
pub enum QueryError {
  #[error("empty statement")]
  EmptyStatement,

  #[error("only read-only SELECT statements may be executed")]
  NotReadOnly,

  #[error("only a single statement may be executed")]
  MultipleStatements,

  #[error("query did not finish within {} ms", .0.as_millis())]
  TimedOut(std::time::Duration),

  #[error("no value supplied for parameter {0}")]
  MissingParameter(String),

  #[error("positional parameter #{0} is not supported; use named placeholders")]
  PositionalParameter(usize),

  #[error("{0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("{0}")]
  Connection(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
