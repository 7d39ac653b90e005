//! HTTP surface of the phonebook service.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`PersonStore`] and [`QueryExecutor`], and a [`Translator`] over any
//! [`CompletionClient`].
//!
//! | Method | Path                       | Notes                               |
//! |--------|----------------------------|-------------------------------------|
//! | `POST` | `/accept_webhook`          | person lifecycle events             |
//! | `GET`  | `/get_name`                | `?person_id=<uuid>`                 |
//! | `POST` | `/execute_custom_nl_query` | English question in, rows out       |
//! | `GET`  | `/nl-to-sql`               | static page driving the query route |

pub mod error;
pub mod people;
pub mod query;
pub mod webhook;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  response::Html,
  routing::{get, post},
};
use phonebook_core::store::{PersonStore, QueryExecutor};
use phonebook_nlq::{
  CompletionClient, SchemaDescription, Translator, openai::OpenAiConfig,
  translator::DEFAULT_MAX_TOKENS,
};
use phonebook_store_sqlite::QueryLimits;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "0.0.0.0".into() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("phonebook.db") }

fn default_max_tokens() -> u32 { DEFAULT_MAX_TOKENS }

fn default_query_timeout_ms() -> u64 {
  QueryLimits::default().timeout.as_millis() as u64
}

fn default_query_max_rows() -> usize { QueryLimits::default().max_rows }

/// Bounds on model-generated queries, the `[query]` config table.
#[derive(Deserialize, Clone, Copy, Debug)]
pub struct QueryConfig {
  #[serde(default = "default_query_timeout_ms")]
  pub timeout_ms: u64,
  #[serde(default = "default_query_max_rows")]
  pub max_rows:   usize,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self { timeout_ms: default_query_timeout_ms(), max_rows: default_query_max_rows() }
  }
}

impl From<QueryConfig> for QueryLimits {
  fn from(config: QueryConfig) -> Self {
    QueryLimits {
      timeout:  Duration::from_millis(config.timeout_ms),
      max_rows: config.max_rows,
    }
  }
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `PHONEBOOK_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Output-length cap for each translation request.
  #[serde(default = "default_max_tokens")]
  pub max_tokens: u32,
  /// Tables described to the model.
  #[serde(default)]
  pub schema:     SchemaDescription,
  #[serde(default)]
  pub query:      QueryConfig,
  pub llm:        OpenAiConfig,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub store:      Arc<S>,
  pub translator: Arc<Translator<C>>,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      translator: Arc::clone(&self.translator),
    }
  }
}

impl<S, C: CompletionClient> AppState<S, C> {
  pub fn new(store: S, translator: Translator<C>) -> Self {
    Self { store: Arc::new(store), translator: Arc::new(translator) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the service router. Cross-origin requests are accepted from any
/// origin, with credentials.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: PersonStore + QueryExecutor + 'static,
  C: CompletionClient + 'static,
{
  Router::new()
    .route("/accept_webhook", post(webhook::accept::<S, C>))
    .route("/get_name", get(people::get_name::<S, C>))
    .route("/execute_custom_nl_query", post(query::execute::<S, C>))
    .route("/nl-to-sql", get(nl_to_sql_page))
    .layer(CorsLayer::very_permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /nl-to-sql`
async fn nl_to_sql_page() -> Html<&'static str> {
  Html(include_str!("../assets/nl_to_sql.html"))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
