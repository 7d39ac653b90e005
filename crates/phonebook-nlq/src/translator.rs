//! [`Translator`]: turns a question into raw model text.

use crate::{
  CompletionClient, CompletionRequest, SchemaDescription, TranslateError, prompt,
};

/// Output-length cap used unless overridden.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Sends one deterministic completion request per question.
///
/// No retries are attempted; callers that need them wrap the translator.
pub struct Translator<C> {
  client:     C,
  schema:     SchemaDescription,
  max_tokens: u32,
}

impl<C: CompletionClient> Translator<C> {
  pub fn new(client: C, schema: SchemaDescription) -> Self {
    Self { client, schema, max_tokens: DEFAULT_MAX_TOKENS }
  }

  pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = max_tokens;
    self
  }

  pub fn schema(&self) -> &SchemaDescription { &self.schema }

  pub fn client(&self) -> &C { &self.client }

  /// The request that [`translate`](Self::translate) would send.
  pub fn request(&self, question: &str) -> CompletionRequest {
    CompletionRequest {
      messages:    prompt::messages(&self.schema, question),
      temperature: 0.0,
      max_tokens:  self.max_tokens,
    }
  }

  /// Ask the model to translate `question`. Returns the trimmed raw text.
  pub async fn translate(&self, question: &str) -> Result<String, TranslateError> {
    let question = question.trim();
    if question.is_empty() {
      return Err(TranslateError::EmptyQuestion);
    }

    let request = self.request(question);
    let raw = self
      .client
      .complete(&request)
      .await
      .map_err(|e| TranslateError::Completion(Box::new(e)))?;

    tracing::debug!(chars = raw.len(), "received model response");
    Ok(raw.trim().to_owned())
  }
}
