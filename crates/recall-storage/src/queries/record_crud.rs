//! Insert, get, update, and delete for memory records, plus row mapping.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use recall_core::errors::RecallResult;
use recall_core::memory::{Confidence, EmbeddingStatus, ImportanceTier, MemoryRecord, MemoryType};

use crate::to_storage_err;

/// Column list shared by every SELECT that maps into [`MemoryRecord`].
pub const RECORD_COLUMNS: &str = "id, collection, title, content, trigger_phrases, memory_type, \
     tier, importance_weight, half_life_days, stability, difficulty, last_review, review_count, \
     confidence, validation_count, access_count, last_accessed, is_pinned, is_archived, \
     parent_id, chunk_index, chunk_label, embedding_status, retry_count, last_retry_at, \
     failure_reason, content_hash, created_at, updated_at";

pub fn insert_record(conn: &Connection, record: &MemoryRecord) -> RecallResult<i64> {
    let triggers = serde_json::to_string(&record.trigger_phrases)?;
    conn.execute(
        "INSERT INTO memories (
            collection, title, content, trigger_phrases, memory_type, tier, importance_weight,
            half_life_days, stability, difficulty, last_review, review_count, confidence,
            validation_count, access_count, last_accessed, is_pinned, is_archived, parent_id,
            chunk_index, chunk_label, embedding_status, retry_count, last_retry_at,
            failure_reason, content_hash, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                  ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28)",
        params![
            record.collection,
            record.title,
            record.content,
            triggers,
            record.memory_type.map(|t| t.as_str()),
            record.tier.as_str(),
            record.importance_weight,
            record.half_life_days,
            record.stability,
            record.difficulty,
            record.last_review.map(|t| t.to_rfc3339()),
            i64::from(record.review_count),
            record.confidence.value(),
            i64::from(record.validation_count),
            record.access_count as i64,
            record.last_accessed.map(|t| t.to_rfc3339()),
            record.is_pinned,
            record.is_archived,
            record.parent_id,
            record.chunk_index.map(i64::from),
            record.chunk_label,
            record.embedding_status.as_str(),
            i64::from(record.retry_count),
            record.last_retry_at.map(|t| t.to_rfc3339()),
            record.failure_reason,
            record.content_hash,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_record(conn: &Connection, id: i64) -> RecallResult<Option<MemoryRecord>> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM memories WHERE id = ?1"),
        params![id],
        row_to_record,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn get_records(conn: &Connection, ids: &[i64]) -> RecallResult<Vec<MemoryRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM memories WHERE id IN ({placeholders}) ORDER BY id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), row_to_record)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Rewrite every mutable column. Returns the number of rows changed.
pub fn update_record(conn: &Connection, record: &MemoryRecord) -> RecallResult<usize> {
    let triggers = serde_json::to_string(&record.trigger_phrases)?;
    conn.execute(
        "UPDATE memories SET
            collection = ?2, title = ?3, content = ?4, trigger_phrases = ?5, memory_type = ?6,
            tier = ?7, importance_weight = ?8, half_life_days = ?9, stability = ?10,
            difficulty = ?11, last_review = ?12, review_count = ?13, confidence = ?14,
            validation_count = ?15, access_count = ?16, last_accessed = ?17, is_pinned = ?18,
            is_archived = ?19, parent_id = ?20, chunk_index = ?21, chunk_label = ?22,
            embedding_status = ?23, retry_count = ?24, last_retry_at = ?25,
            failure_reason = ?26, content_hash = ?27, updated_at = ?28
         WHERE id = ?1",
        params![
            record.id,
            record.collection,
            record.title,
            record.content,
            triggers,
            record.memory_type.map(|t| t.as_str()),
            record.tier.as_str(),
            record.importance_weight,
            record.half_life_days,
            record.stability,
            record.difficulty,
            record.last_review.map(|t| t.to_rfc3339()),
            i64::from(record.review_count),
            record.confidence.value(),
            i64::from(record.validation_count),
            record.access_count as i64,
            record.last_accessed.map(|t| t.to_rfc3339()),
            record.is_pinned,
            record.is_archived,
            record.parent_id,
            record.chunk_index.map(i64::from),
            record.chunk_label,
            record.embedding_status.as_str(),
            i64::from(record.retry_count),
            record.last_retry_at.map(|t| t.to_rfc3339()),
            record.failure_reason,
            record.content_hash,
            record.updated_at.to_rfc3339(),
        ],
    )
    .map_err(to_storage_err)
}

/// Delete records and their chunk children. Returns the number of rows removed.
pub fn delete_records(conn: &Connection, ids: &[i64]) -> RecallResult<usize> {
    let mut removed = 0;
    for id in ids {
        removed += conn
            .execute("DELETE FROM memories WHERE parent_id = ?1", params![id])
            .map_err(to_storage_err)?;
        removed += conn
            .execute("DELETE FROM memories WHERE id = ?1", params![id])
            .map_err(to_storage_err)?;
    }
    Ok(removed)
}

/// Run a SELECT over [`RECORD_COLUMNS`] and collect the mapped rows.
pub fn query_records(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RecallResult<Vec<MemoryRecord>> {
    let mut stmt = conn.prepare(sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params, row_to_record)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Normalize a row into a [`MemoryRecord`]. Unknown tiers, types, and statuses
/// take their lenient defaults; malformed trigger JSON becomes an empty list.
pub fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MemoryRecord> {
    let triggers: String = row.get("trigger_phrases")?;
    let memory_type: Option<String> = row.get("memory_type")?;
    let tier: String = row.get("tier")?;
    let status: String = row.get("embedding_status")?;
    let access_count: i64 = row.get("access_count")?;
    let chunk_index: Option<i64> = row.get("chunk_index")?;

    Ok(MemoryRecord {
        id: row.get("id")?,
        collection: row.get("collection")?,
        title: row.get("title")?,
        content: row.get("content")?,
        trigger_phrases: serde_json::from_str(&triggers).unwrap_or_default(),
        memory_type: memory_type.as_deref().and_then(MemoryType::normalize),
        tier: ImportanceTier::normalize(&tier),
        importance_weight: row.get("importance_weight")?,
        half_life_days: row.get("half_life_days")?,
        stability: row.get("stability")?,
        difficulty: row.get("difficulty")?,
        last_review: opt_ts(row, "last_review")?,
        review_count: row.get("review_count")?,
        confidence: Confidence::new(row.get("confidence")?),
        validation_count: row.get("validation_count")?,
        access_count: access_count.max(0) as u64,
        last_accessed: opt_ts(row, "last_accessed")?,
        is_pinned: row.get("is_pinned")?,
        is_archived: row.get("is_archived")?,
        parent_id: row.get("parent_id")?,
        chunk_index: chunk_index.and_then(|i| u32::try_from(i).ok()),
        chunk_label: row.get("chunk_label")?,
        embedding_status: EmbeddingStatus::normalize(&status),
        retry_count: row.get("retry_count")?,
        last_retry_at: opt_ts(row, "last_retry_at")?,
        failure_reason: row.get("failure_reason")?,
        content_hash: row.get("content_hash")?,
        created_at: ts(row, "created_at")?,
        updated_at: ts(row, "updated_at")?,
    })
}

fn parse_ts(idx: &str, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("{idx}: {e}").into(),
            )
        })
}

fn ts(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_ts(column, &raw)
}

fn opt_ts(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|r| parse_ts(column, &r)).transpose()
}
