//! JSON REST API for browsing the iw revision tree.
//!
//! Exposes an axum [`Router`] backed by any [`iw_core::store::RevisionStore`].
//! The API is read-only; new revisions are created through the edit flow.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest_service("/api", iw_api::api_router(store.clone(), root_id))
//! ```

pub mod error;
pub mod revisions;

use std::sync::Arc;

use axum::{Router, routing::get};
use iw_core::store::RevisionStore;
use uuid::Uuid;

pub use error::ApiError;

/// State shared by the API handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub root_id: Uuid,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), root_id: self.root_id }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` is a plain service, so it can be mounted with
/// `nest_service` under a router of any state type.
pub fn api_router<S>(store: Arc<S>, root_id: Uuid) -> Router<()>
where
  S: RevisionStore + 'static,
{
  Router::new()
    .route("/root", get(revisions::root::<S>))
    .route("/revisions/{id}", get(revisions::get_one::<S>))
    .route("/revisions/{id}/children", get(revisions::children::<S>))
    .route("/revisions/{id}/lineage", get(revisions::lineage::<S>))
    .with_state(ApiState { store, root_id })
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use iw_core::revision::{NewRevision, Revision};
  use iw_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  use super::*;

  async fn setup() -> (Router, Arc<SqliteStore>, Uuid) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let root = store.get_or_create_root("<html></html>".into()).await.unwrap();
    (api_router(store.clone(), root), store, root)
  }

  async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
  }

  async fn add_child(store: &SqliteStore, parent_id: Uuid, content: &str) -> Revision {
    store
      .create_child(NewRevision {
        parent_id,
        content: content.into(),
        prompt: "edit".into(),
        model_response: "resp".into(),
      })
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn root_endpoint_returns_bootstrap_revision() {
    let (router, _, root) = setup().await;
    let (status, body) = get_json(router, "/root").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], root.to_string());
    assert_eq!(body["content"], "<html></html>");
    assert!(body["parent_id"].is_null());
  }

  #[tokio::test]
  async fn get_revision() {
    let (router, store, root) = setup().await;
    let child = add_child(&store, root, "<html>1</html>").await;

    let (status, body) = get_json(router, &format!("/revisions/{}", child.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parent_id"], root.to_string());
    assert_eq!(body["prompt"], "edit");
    assert_eq!(body["model_response"], "resp");
  }

  #[tokio::test]
  async fn unknown_revision_is_404() {
    let (router, _, _) = setup().await;
    let (status, body) = get_json(router, &format!("/revisions/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn malformed_id_is_rejected() {
    let (router, _, _) = setup().await;
    let req = Request::builder().uri("/revisions/xyz").body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn children_and_lineage() {
    let (router, store, root) = setup().await;
    let a = add_child(&store, root, "a").await;
    let b = add_child(&store, root, "b").await;
    let a2 = add_child(&store, a.id, "a2").await;

    let (_, kids) = get_json(router.clone(), &format!("/revisions/{root}/children")).await;
    let kid_ids: Vec<_> = kids.as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(kid_ids, vec![Value::from(a.id.to_string()), Value::from(b.id.to_string())]);

    let (status, chain) = get_json(router.clone(), &format!("/revisions/{}/lineage", a2.id)).await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<_> = chain
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["content"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(contents, ["a2", "a", "<html></html>"]);

    let (status, _) = get_json(router, &format!("/revisions/{}/lineage", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
