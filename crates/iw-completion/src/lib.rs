//! Hosted language-model client for iw.
//!
//! [`AnthropicClient`] implements [`iw_core::completion::CompletionService`]
//! over the Anthropic Messages API.

mod client;

pub mod error;

pub use client::{AnthropicClient, CompletionConfig};
pub use error::{Error, Result};
