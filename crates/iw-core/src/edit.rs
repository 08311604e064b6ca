//! The edit orchestrator.
//!
//! One call to [`Editor::edit`] takes a request through these stages, in
//! order:
//!
//! | Stage | Work | Failure |
//! |-------|------|---------|
//! | `Received` | validate prompt and parent id | [`Error::InvalidInput`] |
//! | `ParentLoaded` | fetch the parent (root if none given) | [`Error::ParentNotFound`] |
//! | `Completed` | ask the completion service | [`Error::Completion`] |
//! | `Parsed` | extract edit blocks | |
//! | `Patched` | apply them to the parent content | |
//! | `Committed` | insert the child revision | [`Error::Storage`] |
//!
//! Nothing is written before `Committed`, and that stage is a single insert,
//! so an aborted or cancelled request leaves the tree untouched.

use std::{fmt, sync::Arc};

use uuid::Uuid;

use crate::{
  Error, Result,
  blocks::parse_edit_blocks,
  completion::CompletionService,
  patch::apply_edits_with_report,
  prompt::build_edit_prompt,
  revision::{NewRevision, Revision},
  store::RevisionStore,
};

/// Where an edit request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
  Received,
  ParentLoaded,
  Completed,
  Parsed,
  Patched,
  Committed,
}

impl fmt::Display for EditStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Received => "received",
      Self::ParentLoaded => "parent_loaded",
      Self::Completed => "completed",
      Self::Parsed => "parsed",
      Self::Patched => "patched",
      Self::Committed => "committed",
    };
    f.write_str(s)
  }
}

/// A user's request to derive a new revision.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
  /// Unparsed parent id as received from the client. `None` or blank means
  /// the bootstrap root.
  pub parent_id:  Option<String>,
  pub prompt:     String,
  /// URLs of files uploaded alongside the request.
  pub asset_urls: Vec<String>,
}

/// Coordinates a [`RevisionStore`] and a [`CompletionService`].
///
/// The root id comes from [`RevisionStore::get_or_create_root`] at startup and
/// is passed in explicitly.
pub struct Editor<S, C> {
  store:      Arc<S>,
  completion: Arc<C>,
  root_id:    Uuid,
}

impl<S, C> Editor<S, C>
where
  S: RevisionStore,
  C: CompletionService,
{
  pub fn new(store: Arc<S>, completion: Arc<C>, root_id: Uuid) -> Self {
    Self { store, completion, root_id }
  }

  pub fn root_id(&self) -> Uuid { self.root_id }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Run one edit request to completion and return the committed revision.
  pub async fn edit(&self, request: EditRequest) -> Result<Revision> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
      return Err(Error::InvalidInput("prompt must not be empty".into()));
    }
    let parent_id = parse_parent_id(request.parent_id.as_deref())?
      .unwrap_or(self.root_id);
    trace_stage(EditStage::Received, parent_id);

    let parent = self
      .store
      .get(parent_id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::ParentNotFound(parent_id))?;
    trace_stage(EditStage::ParentLoaded, parent_id);

    let response = self
      .completion
      .complete(build_edit_prompt(&parent.content, prompt, &request.asset_urls))
      .await
      .map_err(Error::completion)?;
    if response.trim().is_empty() {
      return Err(Error::Completion("completion service returned an empty response".into()));
    }
    trace_stage(EditStage::Completed, parent_id);

    let blocks = parse_edit_blocks(&response);
    trace_stage(EditStage::Parsed, parent_id);

    let outcome = apply_edits_with_report(&parent.content, &blocks);
    if blocks.is_empty() {
      tracing::warn!(%parent_id, "model response contained no edit blocks");
    }
    if !outcome.skipped.is_empty() {
      tracing::warn!(
        %parent_id,
        skipped = ?outcome.skipped,
        "some edit blocks did not match the document"
      );
    }
    trace_stage(EditStage::Patched, parent_id);

    let revision = self
      .store
      .create_child(NewRevision {
        parent_id,
        content: outcome.content,
        prompt: prompt.to_owned(),
        model_response: response,
      })
      .await
      .map_err(Error::storage)?;

    tracing::info!(
      revision_id = %revision.id,
      %parent_id,
      applied = outcome.applied.len(),
      skipped = outcome.skipped.len(),
      "revision {}",
      EditStage::Committed,
    );
    Ok(revision)
  }
}

fn trace_stage(stage: EditStage, parent_id: Uuid) {
  tracing::debug!(%stage, %parent_id, "edit stage");
}

/// Parse a client-supplied parent id. Blank means "no parent given".
pub fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => Uuid::parse_str(s)
      .map(Some)
      .map_err(|_| Error::InvalidInput(format!("invalid parent_id: {s:?}"))),
  }
}
