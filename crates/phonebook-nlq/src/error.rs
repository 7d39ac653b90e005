//! Error types for `phonebook-nlq`.

use thiserror::Error;

/// The model's text did not have the expected fenced shape.
#[derive(Debug, Error)]
pub enum ParseError {
  #[error("SQL template not found in response")]
  SqlTemplateNotFound,

  #[error("malformed parameters: {0}")]
  MalformedParameters(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TranslateError {
  #[error("natural language query must not be empty")]
  EmptyQuestion,

  #[error("completion request failed: {0}")]
  Completion(#[source] Box<dyn std::error::Error + Send + Sync>),
}
