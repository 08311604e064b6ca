//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Edit(#[from] iw_core::Error),
  /// The multipart body could not be read. `status` is 413 when the body
  /// limit was hit and 400 otherwise.
  #[error("bad form: {message}")]
  Form { status: StatusCode, message: String },
  #[error("asset storage error: {0}")]
  Asset(#[from] std::io::Error),
}

impl Error {
  fn status(&self) -> StatusCode {
    match self {
      Error::Edit(iw_core::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
      Error::Form { status, .. } => *status,
      Error::Edit(iw_core::Error::ParentNotFound(_))
      | Error::Edit(iw_core::Error::RevisionNotFound(_)) => StatusCode::NOT_FOUND,
      Error::Edit(iw_core::Error::Completion(_)) => StatusCode::BAD_GATEWAY,
      Error::Edit(iw_core::Error::Storage(_)) | Error::Asset(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::info!(error = %self, %status, "request rejected");
    }
    (status, self.to_string()).into_response()
  }
}
