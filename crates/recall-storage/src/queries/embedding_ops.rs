//! Embedding vectors and the retry queue.
//!
//! Vectors are stored as little-endian f32 blobs. A record leaves the queue
//! either by storing a vector (`success`) or by exhausting its attempts
//! (`failed`).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{EmbeddingStatus, MemoryRecord};
use recall_core::traits::EmbeddingStats;

use super::record_crud::{query_records, RECORD_COLUMNS};
use crate::{to_storage_err, tx_err};

/// Pending records first, then retry records ordered by attempts and age.
pub fn embedding_queue(
    conn: &Connection,
    limit: usize,
    max_retries: u32,
) -> RecallResult<Vec<MemoryRecord>> {
    query_records(
        conn,
        &format!(
            "SELECT {RECORD_COLUMNS} FROM memories
             WHERE embedding_status IN ('pending', 'retry') AND retry_count < ?1
             ORDER BY CASE embedding_status WHEN 'pending' THEN 0 ELSE 1 END,
                      retry_count ASC, created_at ASC, id ASC
             LIMIT ?2"
        ),
        params![i64::from(max_retries), limit as i64],
    )
}

pub fn store_embedding(
    conn: &mut Connection,
    id: i64,
    embedding: &[f32],
    at: DateTime<Utc>,
) -> RecallResult<()> {
    let blob = encode_vector(embedding);
    let tx = conn
        .transaction()
        .map_err(|e| tx_err("store_embedding", e))?;

    let changed = tx
        .execute(
            "UPDATE memories
             SET embedding_status = 'success', failure_reason = NULL, updated_at = ?2
             WHERE id = ?1",
            params![id, at.to_rfc3339()],
        )
        .map_err(to_storage_err)?;
    if changed == 0 {
        return Err(RecallError::NotFound { id });
    }
    tx.execute(
        "INSERT INTO memory_embeddings (memory_id, embedding, dimensions, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(memory_id) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions,
            created_at = excluded.created_at",
        params![id, blob, embedding.len() as i64, at.to_rfc3339()],
    )
    .map_err(to_storage_err)?;
    tx.commit().map_err(|e| tx_err("store_embedding", e))?;
    Ok(())
}

pub fn record_embedding_failure(
    conn: &mut Connection,
    id: i64,
    reason: &str,
    max_retries: u32,
    at: DateTime<Utc>,
) -> RecallResult<EmbeddingStatus> {
    let tx = conn
        .transaction()
        .map_err(|e| tx_err("record_embedding_failure", e))?;

    let retry_count: u32 = tx
        .query_row(
            "SELECT retry_count FROM memories WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(to_storage_err)?
        .ok_or(RecallError::NotFound { id })?;

    let attempts = retry_count.saturating_add(1);
    let status = if attempts >= max_retries {
        EmbeddingStatus::Failed
    } else {
        EmbeddingStatus::Retry
    };
    tx.execute(
        "UPDATE memories
         SET retry_count = ?2, embedding_status = ?3, last_retry_at = ?4, failure_reason = ?5
         WHERE id = ?1",
        params![id, i64::from(attempts), status.as_str(), at.to_rfc3339(), reason],
    )
    .map_err(to_storage_err)?;
    tx.commit()
        .map_err(|e| tx_err("record_embedding_failure", e))?;
    Ok(status)
}

pub fn mark_embedding_failed(
    conn: &Connection,
    id: i64,
    reason: &str,
    at: DateTime<Utc>,
) -> RecallResult<()> {
    let changed = conn
        .execute(
            "UPDATE memories
             SET embedding_status = 'failed', failure_reason = ?2, last_retry_at = ?3
             WHERE id = ?1",
            params![id, reason, at.to_rfc3339()],
        )
        .map_err(to_storage_err)?;
    if changed == 0 {
        return Err(RecallError::NotFound { id });
    }
    Ok(())
}

/// Move a failed record back to `pending` with a fresh attempt budget.
pub fn reset_for_retry(conn: &Connection, id: i64, at: DateTime<Utc>) -> RecallResult<bool> {
    let changed = conn
        .execute(
            "UPDATE memories
             SET embedding_status = 'pending', retry_count = 0, failure_reason = NULL,
                 last_retry_at = NULL, updated_at = ?2
             WHERE id = ?1 AND embedding_status = 'failed'",
            params![id, at.to_rfc3339()],
        )
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}

pub fn failed_embeddings(conn: &Connection) -> RecallResult<Vec<MemoryRecord>> {
    query_records(
        conn,
        &format!(
            "SELECT {RECORD_COLUMNS} FROM memories
             WHERE embedding_status = 'failed'
             ORDER BY last_retry_at DESC, id DESC"
        ),
        [],
    )
}

pub fn embedding_stats(conn: &Connection) -> RecallResult<EmbeddingStats> {
    conn.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN embedding_status = 'pending' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN embedding_status = 'retry' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN embedding_status = 'failed' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN embedding_status = 'success' THEN 1 ELSE 0 END), 0),
            COUNT(*)
         FROM memories",
        [],
        |row| {
            let count = |idx: usize| row.get::<_, i64>(idx).map(|n| n.max(0) as usize);
            Ok(EmbeddingStats {
                pending: count(0)?,
                retry: count(1)?,
                failed: count(2)?,
                success: count(3)?,
                total: count(4)?,
            })
        },
    )
    .map_err(to_storage_err)
}

/// Stored vector for a record, if any.
pub fn get_embedding(conn: &Connection, id: i64) -> RecallResult<Option<Vec<f32>>> {
    let blob: Option<Vec<u8>> = conn
        .query_row(
            "SELECT embedding FROM memory_embeddings WHERE memory_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(to_storage_err)?;
    Ok(blob.map(|b| decode_vector(&b)))
}

fn encode_vector(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
