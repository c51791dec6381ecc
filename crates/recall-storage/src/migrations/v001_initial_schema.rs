//! v001: memories table with decay, validation, chunk, and retry columns.

use rusqlite::Connection;

use recall_core::errors::RecallResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RecallResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            collection        TEXT NOT NULL DEFAULT '',
            title             TEXT NOT NULL DEFAULT '',
            content           TEXT NOT NULL DEFAULT '',
            trigger_phrases   TEXT NOT NULL DEFAULT '[]',
            memory_type       TEXT,
            tier              TEXT NOT NULL DEFAULT 'normal',
            importance_weight REAL NOT NULL DEFAULT 0.5,
            half_life_days    REAL,
            stability         REAL,
            difficulty        REAL NOT NULL DEFAULT 5.0,
            last_review       TEXT,
            review_count      INTEGER NOT NULL DEFAULT 0,
            confidence        REAL NOT NULL DEFAULT 0.5,
            validation_count  INTEGER NOT NULL DEFAULT 0,
            access_count      INTEGER NOT NULL DEFAULT 0,
            last_accessed     TEXT,
            is_pinned         INTEGER NOT NULL DEFAULT 0,
            is_archived       INTEGER NOT NULL DEFAULT 0,
            parent_id         INTEGER REFERENCES memories(id) ON DELETE CASCADE,
            chunk_index       INTEGER,
            chunk_label       TEXT,
            embedding_status  TEXT NOT NULL DEFAULT 'pending',
            retry_count       INTEGER NOT NULL DEFAULT 0,
            last_retry_at     TEXT,
            failure_reason    TEXT,
            content_hash      TEXT NOT NULL DEFAULT '',
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_collection ON memories(collection);
        CREATE INDEX IF NOT EXISTS idx_memories_tier ON memories(tier);
        CREATE INDEX IF NOT EXISTS idx_memories_archived ON memories(is_archived);
        CREATE INDEX IF NOT EXISTS idx_memories_parent ON memories(parent_id);
        CREATE INDEX IF NOT EXISTS idx_memories_content_hash ON memories(content_hash);
        CREATE INDEX IF NOT EXISTS idx_memories_embedding_status
            ON memories(embedding_status, retry_count);
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}
