//! [`MemoryStore`]: a process-local [`RevisionStore`].
//!
//! Backs tests and the server's `--in-memory` mode. Nothing survives a
//! restart.

use std::{
  collections::HashMap,
  sync::{Arc, RwLock},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  revision::{NewRevision, Revision},
  store::RevisionStore,
};

#[derive(Default)]
struct Inner {
  revisions: HashMap<Uuid, Revision>,
  /// Insertion order, for stable `children` listings.
  order:     Vec<Uuid>,
}

/// An in-memory revision tree.
///
/// Cloning is cheap; clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of stored revisions.
  pub fn len(&self) -> usize {
    self.inner.read().map(|i| i.revisions.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

fn poisoned<T>(_: T) -> Error {
  Error::Storage("memory store lock poisoned".into())
}

impl RevisionStore for MemoryStore {
  type Error = Error;

  async fn get_or_create_root(&self, content: String) -> Result<Uuid> {
    // Check and insert under one write lock so concurrent bootstraps agree.
    let mut inner = self.inner.write().map_err(poisoned)?;

    let existing = inner
      .order
      .iter()
      .filter_map(|id| inner.revisions.get(id))
      .find(|r| r.is_root() && r.content == content)
      .map(|r| r.id);
    if let Some(id) = existing {
      return Ok(id);
    }

    let root = Revision {
      id: Uuid::new_v4(),
      parent_id: None,
      content,
      prompt: None,
      model_response: None,
      created_at: Utc::now(),
    };
    let id = root.id;
    inner.order.push(id);
    inner.revisions.insert(id, root);
    Ok(id)
  }

  async fn create_child(&self, input: NewRevision) -> Result<Revision> {
    let mut inner = self.inner.write().map_err(poisoned)?;

    if !inner.revisions.contains_key(&input.parent_id) {
      return Err(Error::ParentNotFound(input.parent_id));
    }

    let revision = Revision {
      id:             Uuid::new_v4(),
      parent_id:      Some(input.parent_id),
      content:        input.content,
      prompt:         Some(input.prompt),
      model_response: Some(input.model_response),
      created_at:     Utc::now(),
    };
    inner.order.push(revision.id);
    inner.revisions.insert(revision.id, revision.clone());
    Ok(revision)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Revision>> {
    let inner = self.inner.read().map_err(poisoned)?;
    Ok(inner.revisions.get(&id).cloned())
  }

  async fn children(&self, id: Uuid) -> Result<Vec<Revision>> {
    let inner = self.inner.read().map_err(poisoned)?;
    Ok(
      inner
        .order
        .iter()
        .filter_map(|rid| inner.revisions.get(rid))
        .filter(|r| r.parent_id == Some(id))
        .cloned()
        .collect(),
    )
  }

  async fn lineage(&self, id: Uuid) -> Result<Vec<Revision>> {
    let inner = self.inner.read().map_err(poisoned)?;
    let mut chain = Vec::new();
    let mut next = Some(id);
    while let Some(rid) = next {
      let Some(revision) = inner.revisions.get(&rid) else { break };
      next = revision.parent_id;
      chain.push(revision.clone());
    }
    Ok(chain)
  }
}
