//! Handler for `POST /execute_custom_nl_query`.
//!
//! The question is translated by the model, the reply is parsed into a
//! template and parameters, and the template is run read-only against the
//! store. Failures map to distinct `detail` prefixes:
//!
//! | Stage       | Status | `detail`                     |
//! |-------------|--------|------------------------------|
//! | validation  | 400    | `Invalid input: ...`         |
//! | model call  | 500    | `Server error: ...`          |
//! | parsing     | 400    | `Invalid input: ...`         |
//! | execution   | 400    | `SQL execution error: ...`   |
//! | store down  | 500    | `Server error: ...`          |

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use phonebook_core::{
  query::Row,
  store::{PersonStore, QueryExecutor, QueryFailure as _},
};
use phonebook_nlq::{CompletionClient, TranslateError};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct QueryBody {
  pub natural_language_query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
  pub result: Vec<Row>,
}

/// `POST /execute_custom_nl_query`, body: `{"natural_language_query": "..."}`
pub async fn execute<S, C>(
  State(state): State<AppState<S, C>>,
  body: Result<Json<QueryBody>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError>
where
  S: PersonStore + QueryExecutor + 'static,
  C: CompletionClient + 'static,
{
  let Json(body) =
    body.map_err(|e| ApiError::BadRequest(format!("Invalid input: {}", e.body_text())))?;

  let raw = state
    .translator
    .translate(&body.natural_language_query)
    .await
    .map_err(|e| match &e {
      TranslateError::EmptyQuestion => ApiError::BadRequest(format!("Invalid input: {e}")),
      TranslateError::Completion(_) => {
        tracing::error!(error = %e, "model call failed");
        ApiError::server(&e)
      }
    })?;

  let translation = phonebook_nlq::parse(&raw).map_err(|e| {
    tracing::warn!(error = %e, "unusable model response");
    ApiError::BadRequest(format!("Invalid input: {e}"))
  })?;

  let rows = state
    .store
    .execute(&translation)
    .await
    .map_err(|e| {
      if e.is_store_failure() {
        tracing::error!(error = %e, "store unavailable for query");
        ApiError::server(e)
      } else {
        ApiError::BadRequest(format!("SQL execution error: {e}"))
      }
    })?;

  Ok(Json(QueryResponse { result: rows }))
}
