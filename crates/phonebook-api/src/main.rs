//! phonebook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `PHONEBOOK_*` environment variables on top, opens the SQLite store and
//! serves the HTTP API.
//!
//! Nested keys use a double underscore, e.g. `PHONEBOOK_LLM__MODEL`. The
//! model API key may also come from `OPENAI_API_KEY`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use phonebook_api::{AppState, ServerConfig};
use phonebook_nlq::{Translator, openai::OpenAiClient};
use phonebook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Phonebook webhook and natural-language query server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let mut builder = config::Config::builder();
  if let Ok(key) = std::env::var("OPENAI_API_KEY") {
    builder = builder
      .set_default("llm.api_key", key)
      .context("failed to apply OPENAI_API_KEY")?;
  }
  let settings = builder
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("PHONEBOOK")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?
    .with_query_limits(server_cfg.query.into());

  let client = OpenAiClient::new(server_cfg.llm.clone())
    .context("failed to build completion client")?;
  let translator = Translator::new(client, server_cfg.schema.clone())
    .with_max_tokens(server_cfg.max_tokens);

  let app = phonebook_api::router(AppState::new(store, translator));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(model = %server_cfg.llm.model, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
