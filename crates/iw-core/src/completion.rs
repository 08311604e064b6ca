//! The `CompletionService` trait, the seam to the external language model.

use std::future::Future;

/// A text-completion backend: one prompt in, one free-form text response out.
///
/// Implemented by `iw-completion` for the hosted model; tests substitute a
/// scripted implementation.
pub trait CompletionService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn complete(
    &self,
    prompt: String,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}
