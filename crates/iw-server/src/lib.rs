//! HTTP front end for the iw revision-tree editor.
//!
//! Serves stored revisions as HTML pages, accepts edit requests with optional
//! uploads, and mounts the JSON API from `iw-api` under `/api`.

pub mod assets;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use iw_completion::CompletionConfig;
use iw_core::{completion::CompletionService, edit::Editor, store::RevisionStore};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use assets::AssetStore;
use handlers::{modify, pages};

/// The bootstrap document used when no `template_path` is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/index.html");

/// The editor overlay every page loads from [`OVERLAY_PATH`].
pub const OVERLAY_SCRIPT: &str = include_str!("../static/modification.js");
pub const OVERLAY_PATH: &str = "/static/modification.js";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `IW__*`
/// environment variables.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// Externally reachable root, used to build asset URLs.
  pub base_url:         String,
  pub store_path:       PathBuf,
  /// HTML file the root revision is bootstrapped from.
  pub template_path:    Option<PathBuf>,
  pub asset_dir:        PathBuf,
  pub max_upload_bytes: usize,
  pub completion:       CompletionConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".to_owned(),
      port:             8008,
      base_url:         "http://localhost:8008".to_owned(),
      store_path:       PathBuf::from("iw.db"),
      template_path:    None,
      asset_dir:        PathBuf::from("assets"),
      max_upload_bytes: 20 * 1024 * 1024,
      completion:       CompletionConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub editor: Arc<Editor<S, C>>,
  pub assets: Arc<AssetStore>,
  pub config: Arc<ServerConfig>,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      editor: self.editor.clone(),
      assets: self.assets.clone(),
      config: self.config.clone(),
    }
  }
}

impl<S, C> AppState<S, C>
where
  S: RevisionStore,
  C: CompletionService,
{
  /// Wire up an editor rooted at `root_id` plus an asset store from `config`.
  pub fn new(store: Arc<S>, completion: Arc<C>, root_id: uuid::Uuid, config: ServerConfig) -> Self {
    let assets = AssetStore::new(config.asset_dir.clone(), &config.base_url);
    Self {
      editor: Arc::new(Editor::new(store, completion, root_id)),
      assets: Arc::new(assets),
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: RevisionStore + 'static,
  C: CompletionService + 'static,
{
  let api = iw_api::api_router(state.editor.store().clone(), state.editor.root_id());

  Router::new()
    .route("/",       get(pages::index::<S, C>))
    .route("/modify", post(modify::handler::<S, C>))
    .route(OVERLAY_PATH, get(pages::overlay))
    .route("/{id}",   get(pages::revision::<S, C>))
    .nest_service("/assets", ServeDir::new(state.assets.dir()))
    .nest_service("/api", api)
    .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
