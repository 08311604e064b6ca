//! One immutable version of the document.
//!
//! Revisions form a tree. A revision is never updated; every edit produces a
//! new child that points back at the revision it was derived from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A stored version of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
  pub id:             Uuid,
  /// `None` only for root revisions.
  pub parent_id:      Option<Uuid>,
  pub content:        String,
  /// The instruction that produced this revision from its parent.
  pub prompt:         Option<String>,
  /// The raw model output the content was patched from.
  pub model_response: Option<String>,
  /// Server-assigned; never changes after creation.
  pub created_at:     DateTime<Utc>,
}

impl Revision {
  pub fn is_root(&self) -> bool { self.parent_id.is_none() }
}

/// Input to [`crate::store::RevisionStore::create_child`].
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewRevision {
  pub parent_id:      Uuid,
  pub content:        String,
  pub prompt:         String,
  pub model_response: String,
}

/// SHA-256 hex digest of `content`. Stores index root revisions by this value.
pub fn content_hash(content: &str) -> String {
  hex::encode(Sha256::digest(content.as_bytes()))
}
