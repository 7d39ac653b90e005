//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"detail": "<short description>"}`. Internal
//! error chains are logged, never returned.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Unprocessable(String),

  #[error("{0}")]
  Internal(String),
}

impl ApiError {
  pub fn invalid_input() -> Self { Self::BadRequest("Invalid input".into()) }

  pub fn person_not_found() -> Self { Self::NotFound("Person not found".into()) }

  /// A 500 that names the underlying failure.
  pub fn server(e: impl std::fmt::Display) -> Self {
    Self::Internal(format!("Server error: {e}"))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}
