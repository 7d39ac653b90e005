//! [`CompletionClient`] for OpenAI-compatible chat completion endpoints.
//!
//! Posts to `{base_url}/chat/completions` with bearer authentication and
//! returns the content of the first choice.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ChatMessage, CompletionClient, CompletionRequest};

fn default_base_url() -> String { "https://api.openai.com/v1".into() }

fn default_model() -> String { "gpt-3.5-turbo".into() }

fn default_timeout_secs() -> u64 { 30 }

/// Connection settings, deserialised from the `[llm]` config table.
#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
  pub api_key:      String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_model")]
  pub model:        String,
  /// Whole-request timeout; the model call is otherwise unbounded.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl OpenAiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:      api_key.into(),
      base_url:     default_base_url(),
      model:        default_model(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("completion endpoint returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("completion response contained no message content")]
  EmptyResponse,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
  model:       &'a str,
  messages:    &'a [ChatMessage],
  temperature: f32,
  max_tokens:  u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
  content: Option<String>,
}

impl ChatCompletionResponse {
  fn into_content(self) -> Result<String, Error> {
    self
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .ok_or(Error::EmptyResponse)
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiClient {
  http:   reqwest::Client,
  config: OpenAiConfig,
}

impl OpenAiClient {
  pub fn new(config: OpenAiConfig) -> Result<Self, Error> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { http, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

impl CompletionClient for OpenAiClient {
  type Error = Error;

  async fn complete(&self, request: &CompletionRequest) -> Result<String, Error> {
    let body = ChatCompletionBody {
      model:       &self.config.model,
      messages:    &request.messages,
      temperature: request.temperature,
      max_tokens:  request.max_tokens,
    };

    let resp = self
      .http
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    resp.json::<ChatCompletionResponse>().await?.into_content()
  }
}
