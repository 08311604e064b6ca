//! Error type for `iw-completion`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The API answered with a non-success status.
  #[error("completion API returned {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("completion API returned no text content")]
  EmptyResponse,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
