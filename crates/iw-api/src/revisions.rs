//! Handlers for `/revisions` and `/root`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/root` | The bootstrap root revision |
//! | `GET`  | `/revisions/:id` | 404 if not found |
//! | `GET`  | `/revisions/:id/children` | Oldest first; empty for leaves |
//! | `GET`  | `/revisions/:id/lineage` | The revision, then each ancestor up to the root |

use axum::{
  Json,
  extract::{Path, State},
};
use iw_core::{revision::Revision, store::RevisionStore};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

async fn fetch<S>(store: &S, id: Uuid) -> Result<Revision, ApiError>
where
  S: RevisionStore,
{
  store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("revision {id} not found")))
}

// ─── Root ─────────────────────────────────────────────────────────────────────

/// `GET /root`
pub async fn root<S>(State(state): State<ApiState<S>>) -> Result<Json<Revision>, ApiError>
where
  S: RevisionStore,
{
  Ok(Json(fetch(state.store.as_ref(), state.root_id).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /revisions/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Revision>, ApiError>
where
  S: RevisionStore,
{
  Ok(Json(fetch(state.store.as_ref(), id).await?))
}

// ─── Children ─────────────────────────────────────────────────────────────────

/// `GET /revisions/:id/children`
pub async fn children<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Revision>>, ApiError>
where
  S: RevisionStore,
{
  let children = state.store.children(id).await.map_err(ApiError::store)?;
  Ok(Json(children))
}

// ─── Lineage ──────────────────────────────────────────────────────────────────

/// `GET /revisions/:id/lineage`
pub async fn lineage<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Revision>>, ApiError>
where
  S: RevisionStore,
{
  let chain = state.store.lineage(id).await.map_err(ApiError::store)?;
  if chain.is_empty() {
    return Err(ApiError::NotFound(format!("revision {id} not found")));
  }
  Ok(Json(chain))
}
