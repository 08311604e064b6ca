//! Async HTTP client for the Anthropic Messages API.

use std::time::Duration;

use iw_core::completion::CompletionService;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Connection and model settings; the `[completion]` section of the server
/// config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
  /// Base URL; `/v1/messages` is appended.
  pub api_url:      String,
  pub api_key:      String,
  pub model:        String,
  pub max_tokens:   u32,
  pub timeout_secs: u64,
}

impl Default for CompletionConfig {
  fn default() -> Self {
    Self {
      api_url:      "https://api.anthropic.com".to_owned(),
      api_key:      String::new(),
      model:        "claude-3-5-sonnet-20241022".to_owned(),
      max_tokens:   4096,
      timeout_secs: 120,
    }
  }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
  model:      &'a str,
  max_tokens: u32,
  messages:   Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
  #[serde(default)]
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
  Text { text: String },
  #[serde(other)]
  Other,
}

impl MessagesResponse {
  /// Concatenate all text blocks of the reply.
  fn into_text(self) -> Result<String> {
    let text: String = self
      .content
      .into_iter()
      .filter_map(|b| match b {
        ContentBlock::Text { text } => Some(text),
        ContentBlock::Other => None,
      })
      .collect();
    if text.is_empty() {
      return Err(Error::EmptyResponse);
    }
    Ok(text)
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Completion client for the Messages API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AnthropicClient {
  client: Client,
  config: CompletionConfig,
}

impl AnthropicClient {
  pub fn new(config: CompletionConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/v1/messages", self.config.api_url.trim_end_matches('/'))
  }

  /// `POST /v1/messages` with a single user message.
  pub async fn send(&self, prompt: &str) -> Result<String> {
    let body = MessagesRequest {
      model:      &self.config.model,
      max_tokens: self.config.max_tokens,
      messages:   vec![Message { role: "user", content: prompt }],
    };

    tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "sending completion request");

    let resp = self
      .client
      .post(self.url())
      .header("x-api-key", &self.config.api_key)
      .header("anthropic-version", ANTHROPIC_VERSION)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }

    resp.json::<MessagesResponse>().await?.into_text()
  }
}

impl CompletionService for AnthropicClient {
  type Error = Error;

  async fn complete(&self, prompt: String) -> Result<String> {
    self.send(&prompt).await
  }
}
