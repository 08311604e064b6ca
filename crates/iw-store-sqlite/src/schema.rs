//! SQL schema for the iw SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Revisions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS revisions (
    id             TEXT PRIMARY KEY,
    parent_id      TEXT REFERENCES revisions(id),  -- NULL only for roots
    content        TEXT NOT NULL,
    content_hash   TEXT NOT NULL,                  -- SHA-256 hex of content
    prompt         TEXT,
    model_response TEXT,
    created_at     TEXT NOT NULL                   -- ISO 8601 UTC; server-assigned
);

-- One root per distinct bootstrap document. Concurrent bootstraps collapse
-- onto the first writer's row.
CREATE UNIQUE INDEX IF NOT EXISTS revisions_root_hash_idx
    ON revisions(content_hash) WHERE parent_id IS NULL;

CREATE INDEX IF NOT EXISTS revisions_parent_idx ON revisions(parent_id);

PRAGMA user_version = 1;
";
