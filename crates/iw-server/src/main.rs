//! iw-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), bootstraps the
//! root revision from the configured template, and serves the editor over
//! HTTP.
//!
//! The Anthropic API key is read from `completion.api_key`, `IW__COMPLETION__API_KEY`
//! or, failing both, `ANTHROPIC_API_KEY`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use iw_completion::AnthropicClient;
use iw_core::{completion::CompletionService, memory::MemoryStore, store::RevisionStore};
use iw_server::{AppState, DEFAULT_TEMPLATE, ServerConfig};
use iw_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Prompt-driven HTML editor with a revision tree")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Keep revisions in memory instead of SQLite. Everything is lost on exit.
  #[arg(long)]
  in_memory: bool,
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

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("IW").separator("__"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.completion.api_key.is_empty()
    && let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
  {
    server_cfg.completion.api_key = key;
  }
  if server_cfg.completion.api_key.is_empty() {
    tracing::warn!("no Anthropic API key configured; edits will fail");
  }

  let template = match &server_cfg.template_path {
    Some(path) => {
      let path = expand_tilde(path);
      tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read template at {path:?}"))?
    }
    None => DEFAULT_TEMPLATE.to_owned(),
  };

  let completion = AnthropicClient::new(server_cfg.completion.clone())
    .context("failed to build completion client")?;

  if cli.in_memory {
    tracing::warn!("using in-memory store; revisions will not persist");
    serve(MemoryStore::new(), completion, server_cfg, template).await
  } else {
    let store_path = expand_tilde(&server_cfg.store_path);
    let store = SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?;
    serve(store, completion, server_cfg, template).await
  }
}

/// Bootstrap the root revision and run the HTTP server until it exits.
async fn serve<S, C>(
  store: S,
  completion: C,
  mut server_cfg: ServerConfig,
  template: String,
) -> anyhow::Result<()>
where
  S: RevisionStore + 'static,
  C: CompletionService + 'static,
{
  let root_id = store
    .get_or_create_root(template)
    .await
    .context("failed to bootstrap root revision")?;
  tracing::info!(%root_id, "root revision ready");

  server_cfg.asset_dir = expand_tilde(&server_cfg.asset_dir);
  tokio::fs::create_dir_all(&server_cfg.asset_dir)
    .await
    .with_context(|| format!("failed to create asset dir {:?}", server_cfg.asset_dir))?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(Arc::new(store), Arc::new(completion), root_id, server_cfg);
  let app = iw_server::router(state);

  tracing::info!("Listening on http://{address}");
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
