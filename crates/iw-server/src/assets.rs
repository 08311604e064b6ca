//! Content-addressed storage for uploaded files.
//!
//! Files are written to the configured `asset_dir` under the SHA-256 hex of
//! their bytes, plus the original extension when it is a plain one. Uploading
//! the same file twice yields the same URL.
//!
//! Uploads are staged in a hidden sibling of `asset_dir` and renamed into
//! place, so the served directory only ever holds complete files.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Error;

/// Writes uploads to disk and hands back their public URL.
#[derive(Debug, Clone)]
pub struct AssetStore {
  dir:      PathBuf,
  staging:  PathBuf,
  base_url: String,
}

impl AssetStore {
  /// `base_url` is the externally reachable server root, e.g.
  /// `http://localhost:8008`.
  pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> Self {
    let dir = dir.into();
    Self {
      staging:  staging_dir(&dir),
      dir,
      base_url: base_url.trim_end_matches('/').to_owned(),
    }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Store `bytes` and return the URL they are served from.
  pub async fn save(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<String, Error> {
    if bytes.is_empty() {
      return Err(iw_core::Error::InvalidInput("uploaded file is empty".into()).into());
    }

    let name = stored_name(file_name, bytes);
    let path = self.dir.join(&name);

    if !tokio::fs::try_exists(&path).await? {
      tokio::fs::create_dir_all(&self.dir).await?;
      tokio::fs::create_dir_all(&self.staging).await?;
      let tmp = self.staging.join(format!("{name}.{}.tmp", Uuid::new_v4()));
      tokio::fs::write(&tmp, bytes).await?;
      tokio::fs::rename(&tmp, &path).await?;
      tracing::info!(asset = %name, size = bytes.len(), "stored upload");
    }

    Ok(format!("{}/assets/{name}", self.base_url))
  }
}

/// `<parent>/.<name>.partial` for an asset dir `<parent>/<name>`. Kept on the
/// same filesystem as `dir` so the final rename is atomic.
fn staging_dir(dir: &Path) -> PathBuf {
  match (dir.parent(), dir.file_name()) {
    (Some(parent), Some(name)) => parent.join(format!(".{}.partial", name.to_string_lossy())),
    _ => dir.join(".partial"),
  }
}

/// `<sha256 hex>[.<ext>]` for an upload.
fn stored_name(file_name: Option<&str>, bytes: &[u8]) -> String {
  let hash = hex::encode(Sha256::digest(bytes));
  match file_name.and_then(extension) {
    Some(ext) => format!("{hash}.{ext}"),
    None => hash,
  }
}

/// The lowercased extension of `file_name`, if it is short and alphanumeric.
fn extension(file_name: &str) -> Option<String> {
  let ext = Path::new(file_name).extension()?.to_str()?;
  let ok = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
  ok.then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_is_sanitised() {
    assert_eq!(extension("Cat.PNG").as_deref(), Some("png"));
    assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
    assert_eq!(extension("noext"), None);
    assert_eq!(extension("evil.p<h>p"), None);
    assert_eq!(extension("../../etc/passwd"), None);
  }

  #[test]
  fn name_is_content_addressed() {
    let a = stored_name(Some("a.png"), b"pixels");
    let b = stored_name(Some("b.png"), b"pixels");
    assert_eq!(a, b);
    assert!(a.ends_with(".png"));
    assert_ne!(a, stored_name(Some("a.png"), b"other pixels"));
  }

  #[tokio::test]
  async fn save_writes_once_and_returns_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = AssetStore::new(dir.path().join("assets"), "http://localhost:8008/");

    let url = store.save(Some("photo.jpg"), b"jpeg bytes").await.unwrap();
    let again = store.save(Some("copy.jpg"), b"jpeg bytes").await.unwrap();
    assert_eq!(url, again);
    assert!(url.starts_with("http://localhost:8008/assets/"));

    let name = url.rsplit('/').next().unwrap();
    let on_disk = std::fs::read(dir.path().join("assets").join(name)).unwrap();
    assert_eq!(on_disk, b"jpeg bytes");
    assert_eq!(std::fs::read_dir(dir.path().join("assets")).unwrap().count(), 1);
  }

  #[test]
  fn staging_is_outside_the_served_dir() {
    assert_eq!(staging_dir(Path::new("assets")), PathBuf::from(".assets.partial"));
    assert_eq!(
      staging_dir(Path::new("/srv/site/uploads/")),
      PathBuf::from("/srv/site/.uploads.partial")
    );
  }

  #[tokio::test]
  async fn staged_files_never_land_in_the_served_dir() {
    let dir = tempfile::tempdir().unwrap();
    let served = dir.path().join("assets");
    let store = AssetStore::new(&served, "http://localhost:8008");

    store.save(Some("a.gif"), b"gif one").await.unwrap();
    store.save(Some("b.gif"), b"gif two").await.unwrap();

    let names: Vec<String> = std::fs::read_dir(&served)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| !n.starts_with('.') && n.ends_with(".gif")));
    assert_eq!(std::fs::read_dir(dir.path().join(".assets.partial")).unwrap().count(), 0);
  }

  #[tokio::test]
  async fn empty_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = AssetStore::new(dir.path(), "http://localhost:8008");
    let err = store.save(Some("x.png"), b"").await.unwrap_err();
    assert!(matches!(err, Error::Edit(iw_core::Error::InvalidInput(_))));
  }
}
