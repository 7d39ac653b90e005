//! Error types for `phonebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown webhook payload type: {0:?}")]
  UnknownPayloadType(String),

  #[error("invalid {payload_type} payload: {source}")]
  InvalidPayload {
    payload_type: &'static str,
    #[source]
    source:       serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
