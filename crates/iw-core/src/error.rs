//! Error types for `iw-core`.

use thiserror::Error;
use uuid::Uuid;

/// A failed edit or lookup. The variants are the categories a caller needs to
/// tell apart: bad input, a missing revision, an upstream model failure, or a
/// storage failure.
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("revision not found: {0}")]
  RevisionNotFound(Uuid),

  #[error("parent revision not found: {0}")]
  ParentNotFound(Uuid),

  #[error("completion failed: {0}")]
  Completion(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error as [`Error::Storage`].
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }

  /// Wrap a completion-service error as [`Error::Completion`].
  pub fn completion(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Completion(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
