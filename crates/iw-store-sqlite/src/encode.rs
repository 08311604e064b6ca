//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use iw_core::revision::Revision;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw row ──────────────────────────────────────────────────────────────────

/// Column list matching [`RawRevision::from_row`].
pub const REVISION_COLUMNS: &str =
  "id, parent_id, content, prompt, model_response, created_at";

/// A `revisions` row as read from SQLite, before decoding.
pub struct RawRevision {
  pub id:             String,
  pub parent_id:      Option<String>,
  pub content:        String,
  pub prompt:         Option<String>,
  pub model_response: Option<String>,
  pub created_at:     String,
}

impl RawRevision {
  /// Read a row selected with [`REVISION_COLUMNS`], starting at column 0.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      parent_id:      row.get(1)?,
      content:        row.get(2)?,
      prompt:         row.get(3)?,
      model_response: row.get(4)?,
      created_at:     row.get(5)?,
    })
  }

  pub fn into_revision(self) -> Result<Revision> {
    Ok(Revision {
      id:             decode_uuid(&self.id)?,
      parent_id:      self.parent_id.as_deref().map(decode_uuid).transpose()?,
      content:        self.content,
      prompt:         self.prompt,
      model_response: self.model_response,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn datetime_roundtrip() {
    let dt = Utc.with_ymd_and_hms(2024, 11, 2, 8, 30, 0).unwrap();
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }

  #[test]
  fn bad_inputs_are_errors() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
    assert!(matches!(decode_uuid("nope"), Err(Error::Uuid(_))));
  }
}
