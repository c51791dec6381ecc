use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RecallResult;
use crate::memory::{Confidence, EmbeddingStatus, ImportanceTier, MemoryRecord};

/// Outcome of an atomic read-compute-write on a record's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceUpdate {
    pub previous: Confidence,
    pub current: Confidence,
    /// Validation count after the update.
    pub validation_count: u32,
    pub tier: ImportanceTier,
}

/// Embedding status counts across the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingStats {
    pub pending: usize,
    pub retry: usize,
    pub failed: usize,
    pub success: usize,
    pub total: usize,
}

impl EmbeddingStats {
    /// Items still waiting for an embedding.
    pub fn queue_size(&self) -> usize {
        self.pending + self.retry
    }
}

/// The storage collaborator: one logical record table plus transaction support.
///
/// Every multi-step mutation runs inside a single transaction; on failure it
/// rolls back and the error is returned to the caller.
pub trait IMemoryStore: Send + Sync {
    // --- CRUD ---
    /// Insert a record, returning its assigned id.
    fn create(&self, record: &MemoryRecord) -> RecallResult<i64>;
    /// Insert many records in one transaction.
    fn create_bulk(&self, records: &[MemoryRecord]) -> RecallResult<Vec<i64>>;
    fn get(&self, id: i64) -> RecallResult<Option<MemoryRecord>>;
    fn get_bulk(&self, ids: &[i64]) -> RecallResult<Vec<MemoryRecord>>;
    fn update(&self, record: &MemoryRecord) -> RecallResult<()>;
    /// Delete many records (and their chunks) in one transaction.
    fn delete_bulk(&self, ids: &[i64]) -> RecallResult<usize>;

    // --- Query ---
    /// Every unarchived record in a collection.
    fn list_collection(&self, collection: &str) -> RecallResult<Vec<MemoryRecord>>;
    /// Chunk children of a parent record, in chunk order.
    fn children_of(&self, parent_id: i64) -> RecallResult<Vec<MemoryRecord>>;
    /// Unarchived, unpinned, unprotected records, stalest decay clock first.
    fn archival_candidates(&self, limit: usize) -> RecallResult<Vec<MemoryRecord>>;

    // --- Validation ---
    /// Apply `adjust` to the stored confidence and increment validation_count,
    /// reading, computing, and writing inside one transaction.
    fn update_confidence(
        &self,
        id: i64,
        adjust: &dyn Fn(Confidence) -> Confidence,
    ) -> RecallResult<ConfidenceUpdate>;
    /// Rewrite the tier to `to` if `guard` accepts the record as read inside the
    /// same transaction. Returns whether the tier changed.
    fn promote_if(
        &self,
        id: i64,
        to: ImportanceTier,
        guard: &dyn Fn(&MemoryRecord) -> bool,
    ) -> RecallResult<bool>;

    // --- Decay ---
    fn record_access(&self, id: i64, at: DateTime<Utc>) -> RecallResult<()>;
    /// Persist the result of an FSRS review.
    fn record_review(
        &self,
        id: i64,
        stability: f64,
        difficulty: f64,
        reviewed_at: DateTime<Utc>,
    ) -> RecallResult<()>;
    /// Set the archived flag on many records in one transaction.
    fn set_archived(&self, ids: &[i64], archived: bool) -> RecallResult<usize>;

    // --- Embedding retry ---
    /// Pending and retry records below `max_retries`, pending first, then by
    /// retry count and age.
    fn embedding_queue(&self, limit: usize, max_retries: u32) -> RecallResult<Vec<MemoryRecord>>;
    /// Store a vector and mark the record's embedding successful.
    fn store_embedding(&self, id: i64, embedding: &[f32], at: DateTime<Utc>) -> RecallResult<()>;
    /// Count one failed attempt. Returns the resulting status, which is
    /// `Failed` once `max_retries` attempts are consumed.
    fn record_embedding_failure(
        &self,
        id: i64,
        reason: &str,
        max_retries: u32,
        at: DateTime<Utc>,
    ) -> RecallResult<EmbeddingStatus>;
    fn mark_embedding_failed(&self, id: i64, reason: &str, at: DateTime<Utc>) -> RecallResult<()>;
    /// Re-queue a permanently failed record. Returns false if it was not failed.
    fn reset_for_retry(&self, id: i64, at: DateTime<Utc>) -> RecallResult<bool>;
    fn failed_embeddings(&self) -> RecallResult<Vec<MemoryRecord>>;
    fn embedding_stats(&self) -> RecallResult<EmbeddingStats>;
}
