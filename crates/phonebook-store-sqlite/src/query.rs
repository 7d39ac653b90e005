//! [`QueryExecutor`] for [`SqliteStore`]: runs model-generated SQL.
//!
//! The template text is handed to SQLite untouched; every placeholder is
//! bound through the driver. Only a single statement that begins with a
//! read-only verb *and* that SQLite itself reports as read-only is run. Each
//! query runs in its own transaction, which is rolled back on any failure.
//!
//! Queries are bounded by [`QueryLimits`]: a progress handler interrupts the
//! statement once its deadline passes, and rows past the cap are never read.
//! The connection thread is shared with the CRUD operations, so a runaway
//! query holds them up for at most the deadline.

use std::{
  ffi::c_int,
  time::{Duration, Instant},
};

use phonebook_core::{
  query::{Row, SqlTranslation},
  store::{QueryExecutor, QueryFailure},
};
use rusqlite::ErrorCode;

use crate::{
  QueryError, SqliteStore,
  encode::{decode_value, encode_value},
};

/// Leading keywords a query may start with.
const READ_VERBS: &[&str] = &["SELECT", "WITH", "VALUES"];

/// Virtual machine instructions between deadline checks.
const PROGRESS_STEPS: c_int = 1_000;

/// Bounds applied to every model-generated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
  /// Wall-clock budget for preparing and stepping the statement.
  pub timeout:  Duration,
  /// Rows read before the result is cut short.
  pub max_rows: usize,
}

impl Default for QueryLimits {
  fn default() -> Self {
    Self { timeout: Duration::from_secs(5), max_rows: 1_000 }
  }
}

impl QueryFailure for QueryError {
  fn is_store_failure(&self) -> bool { matches!(self, QueryError::Connection(_)) }
}

impl QueryExecutor for SqliteStore {
  type Error = QueryError;

  async fn execute(&self, translation: &SqlTranslation) -> Result<Vec<Row>, QueryError> {
    if translation.template.trim().is_empty() {
      return Err(QueryError::EmptyStatement);
    }

    tracing::debug!(
      template = %translation.template,
      params = ?translation.params.as_ref().map(|p| p.keys().collect::<Vec<_>>()),
      "executing query",
    );

    let translation = translation.clone();
    let limits = self.limits;
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let deadline = Instant::now() + limits.timeout;
        tx.progress_handler(PROGRESS_STEPS, Some(move || Instant::now() >= deadline));
        let result = run_query(&tx, &translation, limits.max_rows)
          .map_err(|e| if interrupted(&e) { QueryError::TimedOut(limits.timeout) } else { e });
        tx.progress_handler(PROGRESS_STEPS, None::<fn() -> bool>);

        match result {
          Ok(rows) => {
            tx.commit()?;
            Ok(Ok(rows))
          }
          Err(e) => {
            tx.rollback()?;
            Ok(Err(e))
          }
        }
      })
      .await?;

    match &outcome {
      Ok(rows) => tracing::debug!(rows = rows.len(), "query succeeded"),
      Err(e) => tracing::warn!(error = %e, "query failed and was rolled back"),
    }
    outcome
  }
}

fn interrupted(e: &QueryError) -> bool {
  matches!(e, QueryError::Sqlite(err) if err.sqlite_error_code() == Some(ErrorCode::OperationInterrupted))
}

fn run_query(
  conn: &rusqlite::Connection,
  translation: &SqlTranslation,
  max_rows: usize,
) -> Result<Vec<Row>, QueryError> {
  if !starts_with_read_verb(&translation.template) {
    return Err(QueryError::NotReadOnly);
  }

  let mut batch = rusqlite::Batch::new(conn, &translation.template);
  let mut stmt = batch.next()?.ok_or(QueryError::EmptyStatement)?;
  if batch.next()?.is_some() {
    return Err(QueryError::MultipleStatements);
  }
  if !stmt.readonly() {
    return Err(QueryError::NotReadOnly);
  }

  for index in 1..=stmt.parameter_count() {
    // Bare `?` has no name; `?NNN` is named after its number.
    let name = stmt
      .parameter_name(index)
      .filter(|name| !name.starts_with('?'))
      .map(str::to_owned)
      .ok_or(QueryError::PositionalParameter(index))?;
    let value = translation
      .param(&name)
      .ok_or_else(|| QueryError::MissingParameter(name.clone()))?;
    stmt.raw_bind_parameter(index, encode_value(value))?;
  }

  let columns: Vec<String> = stmt
    .column_names()
    .into_iter()
    .map(str::to_owned)
    .collect();

  let mut rows = stmt.raw_query();
  let mut out = Vec::new();
  while out.len() < max_rows {
    let Some(row) = rows.next()? else { break };
    let mut record = Row::new();
    for (index, column) in columns.iter().enumerate() {
      record.push(column.clone(), decode_value(row.get_ref(index)?));
    }
    out.push(record);
  }
  if out.len() == max_rows {
    tracing::debug!(max_rows, "result capped");
  }
  Ok(out)
}

/// First SQL keyword of `sql`, ignoring leading whitespace, comments and
/// opening parentheses.
fn leading_keyword(sql: &str) -> &str {
  let mut rest = sql;
  loop {
    rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
    if let Some(after) = rest.strip_prefix("--") {
      rest = after.split_once('\n').map_or("", |(_, tail)| tail);
    } else if let Some(after) = rest.strip_prefix("/*") {
      rest = after.split_once("*/").map_or("", |(_, tail)| tail);
    } else {
      break;
    }
  }
  let end = rest
    .find(|c: char| !c.is_ascii_alphabetic())
    .unwrap_or(rest.len());
  &rest[..end]
}

fn starts_with_read_verb(sql: &str) -> bool {
  let keyword = leading_keyword(sql);
  READ_VERBS.iter().any(|verb| verb.eq_ignore_ascii_case(keyword))
}
