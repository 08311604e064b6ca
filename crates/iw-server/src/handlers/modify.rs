//! `POST /modify`: derive a new revision from a prompt.
//!
//! Multipart form fields:
//!
//! | Field | Notes |
//! |-------|-------|
//! | `prompt` | Required, non-empty |
//! | `parent_id` | Optional; blank means the root revision |
//! | `image_files` | Zero or more uploads, offered to the model by URL |
//!
//! Responds `201` with the new revision id as plain text.

use axum::{
  extract::{Multipart, State, multipart::MultipartError},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use iw_core::{completion::CompletionService, edit::EditRequest, store::RevisionStore};

use crate::{AppState, error::Error};

fn bad_form(e: MultipartError) -> Error {
  Error::Form { status: e.status(), message: e.body_text() }
}

pub async fn handler<S, C>(
  State(state): State<AppState<S, C>>,
  mut multipart: Multipart,
) -> Result<Response, Error>
where
  S: RevisionStore,
  C: CompletionService,
{
  let mut request = EditRequest::default();

  while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
    let name = field.name().map(str::to_owned);
    match name.as_deref() {
      Some("prompt") => request.prompt = field.text().await.map_err(bad_form)?,
      Some("parent_id") => request.parent_id = Some(field.text().await.map_err(bad_form)?),
      Some("image_files") => {
        let file_name = field.file_name().map(str::to_owned);
        let data = field.bytes().await.map_err(bad_form)?;
        // Browsers send one empty, unnamed part when no file was picked.
        if data.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
          continue;
        }
        let url = state.assets.save(file_name.as_deref(), &data).await?;
        request.asset_urls.push(url);
      }
      _ => {}
    }
  }

  let revision = state.editor.edit(request).await?;
  Ok((StatusCode::CREATED, revision.id.to_string()).into_response())
}
