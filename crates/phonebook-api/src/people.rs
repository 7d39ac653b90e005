//! Handler for `GET /get_name?person_id=<uuid>`.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use phonebook_core::store::{PersonStore, QueryExecutor};
use phonebook_nlq::CompletionClient;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct GetNameParams {
  pub person_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct NameResponse {
  pub name: String,
}

/// `GET /get_name?person_id=<uuid>`. 422 if the id is not a UUID.
pub async fn get_name<S, C>(
  State(state): State<AppState<S, C>>,
  params: Result<Query<GetNameParams>, QueryRejection>,
) -> Result<Json<NameResponse>, ApiError>
where
  S: PersonStore + QueryExecutor + 'static,
  C: CompletionClient + 'static,
{
  let Query(params) = params
    .map_err(|_| ApiError::Unprocessable("Invalid UUID format".into()))?;

  let person = state
    .store
    .get_person(params.person_id)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, person_id = %params.person_id, "lookup failed");
      ApiError::Internal("Server error".into())
    })?
    .ok_or_else(ApiError::person_not_found)?;

  Ok(Json(NameResponse { name: person.name }))
}
