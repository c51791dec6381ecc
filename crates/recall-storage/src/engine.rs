//! StorageEngine: owns the write connection, runs migrations on open, and
//! implements [`IMemoryStore`].

use std::path::Path;

use chrono::{DateTime, Utc};

use recall_core::config::StorageConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{Confidence, EmbeddingStatus, ImportanceTier, MemoryRecord};
use recall_core::traits::{ConfidenceUpdate, EmbeddingStats, IMemoryStore};

use crate::migrations;
use crate::pool::WriteConnection;
use crate::queries::{decay_ops, embedding_ops, record_crud, validation_ops};
use crate::tx_err;

const IN_MEMORY_PATH: &str = ":memory:";

/// The embedded store. All statements go through one serialized connection.
pub struct StorageEngine {
    writer: WriteConnection,
}

impl StorageEngine {
    /// Open a file-backed store with default settings.
    pub fn open(path: &Path) -> RecallResult<Self> {
        let engine = Self {
            writer: WriteConnection::open(path, StorageConfig::default().busy_timeout_ms)?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> RecallResult<Self> {
        let engine = Self {
            writer: WriteConnection::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open from configuration. A `db_path` of `:memory:` opens an in-memory store.
    pub fn open_with_config(config: &StorageConfig) -> RecallResult<Self> {
        let writer = if config.db_path == IN_MEMORY_PATH {
            WriteConnection::open_in_memory()?
        } else {
            WriteConnection::open(Path::new(&config.db_path), config.busy_timeout_ms)?
        };
        let engine = Self { writer };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> RecallResult<()> {
        let version = self
            .writer
            .with_conn(|conn| migrations::run_migrations(conn))?;
        tracing::info!(schema_version = version, "storage initialized");
        Ok(())
    }

    /// Current schema version.
    pub fn schema_version(&self) -> RecallResult<u32> {
        self.writer
            .with_conn(|conn| migrations::current_version(conn))
    }

    /// Stored embedding vector for a record.
    pub fn embedding(&self, id: i64) -> RecallResult<Option<Vec<f32>>> {
        self.writer
            .with_conn(|conn| embedding_ops::get_embedding(conn, id))
    }
}

impl IMemoryStore for StorageEngine {
    fn create(&self, record: &MemoryRecord) -> RecallResult<i64> {
        self.writer
            .with_conn(|conn| record_crud::insert_record(conn, record))
    }

    fn create_bulk(&self, records: &[MemoryRecord]) -> RecallResult<Vec<i64>> {
        self.writer.with_conn(|conn| {
            let tx = conn.transaction().map_err(|e| tx_err("create_bulk", e))?;
            let mut ids = Vec::with_capacity(records.len());
            for record in records {
                ids.push(record_crud::insert_record(&tx, record)?);
            }
            tx.commit().map_err(|e| tx_err("create_bulk", e))?;
            Ok(ids)
        })
    }

    fn get(&self, id: i64) -> RecallResult<Option<MemoryRecord>> {
        self.writer
            .with_conn(|conn| record_crud::get_record(conn, id))
    }

    fn get_bulk(&self, ids: &[i64]) -> RecallResult<Vec<MemoryRecord>> {
        self.writer
            .with_conn(|conn| record_crud::get_records(conn, ids))
    }

    fn update(&self, record: &MemoryRecord) -> RecallResult<()> {
        let changed = self
            .writer
            .with_conn(|conn| record_crud::update_record(conn, record))?;
        if changed == 0 {
            return Err(RecallError::NotFound { id: record.id });
        }
        Ok(())
    }

    fn delete_bulk(&self, ids: &[i64]) -> RecallResult<usize> {
        self.writer.with_conn(|conn| {
            let tx = conn.transaction().map_err(|e| tx_err("delete_bulk", e))?;
            let removed = record_crud::delete_records(&tx, ids)?;
            tx.commit().map_err(|e| tx_err("delete_bulk", e))?;
            Ok(removed)
        })
    }

    fn list_collection(&self, collection: &str) -> RecallResult<Vec<MemoryRecord>> {
        self.writer
            .with_conn(|conn| decay_ops::list_collection(conn, collection))
    }

    fn children_of(&self, parent_id: i64) -> RecallResult<Vec<MemoryRecord>> {
        self.writer
            .with_conn(|conn| decay_ops::children_of(conn, parent_id))
    }

    fn archival_candidates(&self, limit: usize) -> RecallResult<Vec<MemoryRecord>> {
        self.writer
            .with_conn(|conn| decay_ops::archival_candidates(conn, limit))
    }

    fn update_confidence(
        &self,
        id: i64,
        adjust: &dyn Fn(Confidence) -> Confidence,
    ) -> RecallResult<ConfidenceUpdate> {
        self.writer
            .with_conn(|conn| validation_ops::update_confidence(conn, id, adjust))
    }

    fn promote_if(
        &self,
        id: i64,
        to: ImportanceTier,
        guard: &dyn Fn(&MemoryRecord) -> bool,
    ) -> RecallResult<bool> {
        self.writer
            .with_conn(|conn| validation_ops::promote_if(conn, id, to, guard))
    }

    fn record_access(&self, id: i64, at: DateTime<Utc>) -> RecallResult<()> {
        self.writer
            .with_conn(|conn| decay_ops::record_access(conn, id, at))
    }

    fn record_review(
        &self,
        id: i64,
        stability: f64,
        difficulty: f64,
        reviewed_at: DateTime<Utc>,
    ) -> RecallResult<()> {
        self.writer.with_conn(|conn| {
            decay_ops::record_review(conn, id, stability, difficulty, reviewed_at)
        })
    }

    fn set_archived(&self, ids: &[i64], archived: bool) -> RecallResult<usize> {
        self.writer
            .with_conn(|conn| decay_ops::set_archived(conn, ids, archived))
    }

    fn embedding_queue(&self, limit: usize, max_retries: u32) -> RecallResult<Vec<MemoryRecord>> {
        self.writer
            .with_conn(|conn| embedding_ops::embedding_queue(conn, limit, max_retries))
    }

    fn store_embedding(&self, id: i64, embedding: &[f32], at: DateTime<Utc>) -> RecallResult<()> {
        self.writer
            .with_conn(|conn| embedding_ops::store_embedding(conn, id, embedding, at))
    }

    fn record_embedding_failure(
        &self,
        id: i64,
        reason: &str,
        max_retries: u32,
        at: DateTime<Utc>,
    ) -> RecallResult<EmbeddingStatus> {
        self.writer.with_conn(|conn| {
            embedding_ops::record_embedding_failure(conn, id, reason, max_retries, at)
        })
    }

    fn mark_embedding_failed(&self, id: i64, reason: &str, at: DateTime<Utc>) -> RecallResult<()> {
        self.writer
            .with_conn(|conn| embedding_ops::mark_embedding_failed(conn, id, reason, at))
    }

    fn reset_for_retry(&self, id: i64, at: DateTime<Utc>) -> RecallResult<bool> {
        self.writer
            .with_conn(|conn| embedding_ops::reset_for_retry(conn, id, at))
    }

    fn failed_embeddings(&self) -> RecallResult<Vec<MemoryRecord>> {
        self.writer.with_conn(|conn| embedding_ops::failed_embeddings(conn))
    }

    fn embedding_stats(&self) -> RecallResult<EmbeddingStats> {
        self.writer.with_conn(|conn| embedding_ops::embedding_stats(conn))
    }
}
