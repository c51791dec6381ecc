//! v002: embedding vectors, one row per memory.

use rusqlite::Connection;

use recall_core::errors::RecallResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RecallResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_embeddings (
            memory_id   INTEGER PRIMARY KEY REFERENCES memories(id) ON DELETE CASCADE,
            embedding   BLOB NOT NULL,
            dimensions  INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        );
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}
