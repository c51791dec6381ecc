//! Access tracking, FSRS review persistence, archival flags, and the
//! collection/chunk queries the decay and interference stages read.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::MemoryRecord;

use super::record_crud::{query_records, RECORD_COLUMNS};
use crate::{to_storage_err, tx_err};

pub fn record_access(conn: &Connection, id: i64, at: DateTime<Utc>) -> RecallResult<()> {
    let changed = conn
        .execute(
            "UPDATE memories SET access_count = access_count + 1, last_accessed = ?2
             WHERE id = ?1",
            params![id, at.to_rfc3339()],
        )
        .map_err(to_storage_err)?;
    if changed == 0 {
        return Err(RecallError::NotFound { id });
    }
    Ok(())
}

pub fn record_review(
    conn: &Connection,
    id: i64,
    stability: f64,
    difficulty: f64,
    reviewed_at: DateTime<Utc>,
) -> RecallResult<()> {
    let changed = conn
        .execute(
            "UPDATE memories
             SET stability = ?2, difficulty = ?3, last_review = ?4,
                 review_count = review_count + 1
             WHERE id = ?1",
            params![id, stability, difficulty, reviewed_at.to_rfc3339()],
        )
        .map_err(to_storage_err)?;
    if changed == 0 {
        return Err(RecallError::NotFound { id });
    }
    Ok(())
}

pub fn set_archived(conn: &mut Connection, ids: &[i64], archived: bool) -> RecallResult<usize> {
    let tx = conn.transaction().map_err(|e| tx_err("set_archived", e))?;
    let mut changed = 0;
    {
        let mut stmt = tx
            .prepare("UPDATE memories SET is_archived = ?2 WHERE id = ?1 AND is_archived != ?2")
            .map_err(to_storage_err)?;
        for id in ids {
            changed += stmt.execute(params![id, archived]).map_err(to_storage_err)?;
        }
    }
    tx.commit().map_err(|e| tx_err("set_archived", e))?;
    Ok(changed)
}

/// Unarchived, unpinned records outside the protected tiers, stalest first.
pub fn archival_candidates(conn: &Connection, limit: usize) -> RecallResult<Vec<MemoryRecord>> {
    query_records(
        conn,
        &format!(
            "SELECT {RECORD_COLUMNS} FROM memories
             WHERE is_archived = 0 AND is_pinned = 0
               AND tier NOT IN ('constitutional', 'critical')
             ORDER BY COALESCE(last_review, updated_at) ASC, id ASC
             LIMIT ?1"
        ),
        params![limit as i64],
    )
}

pub fn list_collection(conn: &Connection, collection: &str) -> RecallResult<Vec<MemoryRecord>> {
    query_records(
        conn,
        &format!(
            "SELECT {RECORD_COLUMNS} FROM memories
             WHERE collection = ?1 AND is_archived = 0
             ORDER BY id"
        ),
        params![collection],
    )
}

pub fn children_of(conn: &Connection, parent_id: i64) -> RecallResult<Vec<MemoryRecord>> {
    query_records(
        conn,
        &format!(
            "SELECT {RECORD_COLUMNS} FROM memories
             WHERE parent_id = ?1
             ORDER BY chunk_index, id"
        ),
        params![parent_id],
    )
}
