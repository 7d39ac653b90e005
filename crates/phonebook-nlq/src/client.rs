//! The `CompletionClient` trait and the request it consumes.
//!
//! Clients are constructed explicitly and handed to the
//! [`Translator`](crate::Translator); tests substitute a fake.

use std::future::Future;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
  pub role:    Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// A single-turn chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
  pub messages:    Vec<ChatMessage>,
  pub temperature: f32,
  /// Upper bound on generated tokens.
  pub max_tokens:  u32,
}

/// Anything that can answer a [`CompletionRequest`] with raw text.
pub trait CompletionClient: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn complete<'a>(
    &'a self,
    request: &'a CompletionRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
