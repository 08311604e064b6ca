//! The `RevisionStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `iw-store-sqlite`, or
//! [`crate::memory::MemoryStore`] for tests). Higher layers depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::revision::{NewRevision, Revision};

/// Abstraction over a revision-tree backend.
///
/// The store is append-only: revisions are inserted once and never updated or
/// deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RevisionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Return the id of the parentless revision whose content equals `content`,
  /// creating it if none exists. Calling this repeatedly with the same
  /// content always yields the same id.
  fn get_or_create_root(
    &self,
    content: String,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// Insert a revision under `input.parent_id` and return it.
  ///
  /// Fails without inserting anything if the parent does not exist.
  fn create_child(
    &self,
    input: NewRevision,
  ) -> impl Future<Output = Result<Revision, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a revision by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Revision>, Self::Error>> + Send + '_;

  /// Direct children of `id`, oldest first.
  fn children(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Revision>, Self::Error>> + Send + '_;

  /// The revision `id` followed by each of its ancestors, ending at a root.
  /// Empty if `id` does not resolve.
  fn lineage(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Revision>, Self::Error>> + Send + '_;
}
