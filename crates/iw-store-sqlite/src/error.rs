//! Error type for `iw-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// `create_child` was given a parent id that does not exist.
  #[error("parent revision not found: {0}")]
  ParentNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
