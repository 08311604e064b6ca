//! [`SqliteStore`]: the SQLite implementation of [`RevisionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use iw_core::{
  revision::{NewRevision, Revision, content_hash},
  store::RevisionStore,
};

use crate::{
  encode::{REVISION_COLUMNS, RawRevision, decode_uuid, encode_dt, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A revision tree backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Total number of stored revisions.
  pub async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM revisions", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  /// Run `sql` (selecting [`REVISION_COLUMNS`]) with a single id parameter.
  async fn query_revisions(&self, sql: String, id: Uuid) -> Result<Vec<Revision>> {
    let id_str = encode_uuid(id);

    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawRevision::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }
}

// ─── RevisionStore impl ──────────────────────────────────────────────────────

impl RevisionStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn get_or_create_root(&self, content: String) -> Result<Uuid> {
    let hash   = content_hash(&content);
    let new_id = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());

    let id_str: String = self
      .conn
      .call(move |conn| {
        const SELECT: &str = "SELECT id FROM revisions
           WHERE parent_id IS NULL AND content_hash = ?1 AND content = ?2
           ORDER BY rowid LIMIT 1";

        let existing: Option<String> = conn
          .query_row(SELECT, rusqlite::params![hash, content], |r| r.get(0))
          .optional()?;
        if let Some(id) = existing {
          return Ok(id);
        }

        // A concurrent writer may win between the SELECT and this INSERT; the
        // unique root index turns our insert into a no-op in that case.
        conn.execute(
          "INSERT OR IGNORE INTO revisions
             (id, parent_id, content, content_hash, prompt, model_response, created_at)
           VALUES (?1, NULL, ?2, ?3, NULL, NULL, ?4)",
          rusqlite::params![new_id, content, hash, at_str],
        )?;

        Ok(conn.query_row(SELECT, rusqlite::params![hash, content], |r| r.get(0))?)
      })
      .await?;

    decode_uuid(&id_str)
  }

  async fn create_child(&self, input: NewRevision) -> Result<Revision> {
    let revision = Revision {
      id:             Uuid::new_v4(),
      parent_id:      Some(input.parent_id),
      content:        input.content,
      prompt:         Some(input.prompt),
      model_response: Some(input.model_response),
      created_at:     Utc::now(),
    };

    let id_str         = encode_uuid(revision.id);
    let parent_id_str  = encode_uuid(input.parent_id);
    let content        = revision.content.clone();
    let hash           = content_hash(&content);
    let prompt         = revision.prompt.clone();
    let model_response = revision.model_response.clone();
    let at_str         = encode_dt(revision.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let parent_exists = tx
          .query_row(
            "SELECT 1 FROM revisions WHERE id = ?1",
            rusqlite::params![parent_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !parent_exists {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO revisions
             (id, parent_id, content, content_hash, prompt, model_response, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            parent_id_str,
            content,
            hash,
            prompt,
            model_response,
            at_str,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::ParentNotFound(input.parent_id));
    }
    Ok(revision)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: Uuid) -> Result<Option<Revision>> {
    let sql = format!("SELECT {REVISION_COLUMNS} FROM revisions WHERE id = ?1");
    Ok(self.query_revisions(sql, id).await?.into_iter().next())
  }

  async fn children(&self, id: Uuid) -> Result<Vec<Revision>> {
    let sql = format!(
      "SELECT {REVISION_COLUMNS} FROM revisions WHERE parent_id = ?1 ORDER BY rowid"
    );
    self.query_revisions(sql, id).await
  }

  async fn lineage(&self, id: Uuid) -> Result<Vec<Revision>> {
    let columns = REVISION_COLUMNS
      .split(", ")
      .map(|c| format!("r.{c}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "WITH RECURSIVE chain(id, depth) AS (
         SELECT id, 0 FROM revisions WHERE id = ?1
         UNION ALL
         SELECT r.parent_id, c.depth + 1
         FROM revisions r JOIN chain c ON r.id = c.id
         WHERE r.parent_id IS NOT NULL
       )
       SELECT {columns}
       FROM chain c JOIN revisions r ON r.id = c.id
       ORDER BY c.depth"
    );
    self.query_revisions(sql, id).await
  }
}
