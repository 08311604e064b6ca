//! HTML page handlers: the bootstrap page and any stored revision.

use axum::{
  extract::{Path, State},
  http::header,
  response::{Html, IntoResponse, Redirect, Response},
};
use iw_core::{completion::CompletionService, store::RevisionStore};
use uuid::Uuid;

use crate::{AppState, OVERLAY_SCRIPT, error::Error};

/// `GET /`: the root revision.
pub async fn index<S, C>(State(state): State<AppState<S, C>>) -> Result<Html<String>, Error>
where
  S: RevisionStore,
  C: CompletionService,
{
  let root_id = state.editor.root_id();
  let root = state
    .editor
    .store()
    .get(root_id)
    .await
    .map_err(iw_core::Error::storage)?
    .ok_or(iw_core::Error::RevisionNotFound(root_id))?;
  Ok(Html(root.content))
}

/// `GET /{id}`: a revision's content verbatim. Malformed or unknown ids
/// redirect to `/`.
pub async fn revision<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<String>,
) -> Result<Response, Error>
where
  S: RevisionStore,
  C: CompletionService,
{
  let Ok(id) = Uuid::parse_str(&id) else {
    return Ok(Redirect::to("/").into_response());
  };

  let revision = state
    .editor
    .store()
    .get(id)
    .await
    .map_err(iw_core::Error::storage)?;

  Ok(match revision {
    Some(r) => Html(r.content).into_response(),
    None => Redirect::to("/").into_response(),
  })
}

/// `GET /static/modification.js`: the editor overlay script.
pub async fn overlay() -> impl IntoResponse {
  (
    [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
    OVERLAY_SCRIPT,
  )
}
