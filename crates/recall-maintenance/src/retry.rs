//! Embedding retry queue with exponential-ish backoff.
//!
//! Records whose embedding failed are retried after 1, 5, then 15 minutes.
//! The attempt that exhausts `max_retries` marks the record permanently
//! failed; only [`RetryManager::reset_for_retry`] brings it back.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use recall_core::config::MaintenanceConfig;
use recall_core::errors::RecallResult;
use recall_core::memory::{EmbeddingStatus, MemoryRecord};
use recall_core::traits::{EmbeddingStats, IContentLoader, IEmbeddingProvider, IMemoryStore};
use recall_observability::events;

/// The queue is read this many batches deep so items still in backoff do not
/// starve eligible ones behind them.
const QUEUE_SCAN_FACTOR: usize = 4;

/// Delay before the next attempt for a record that has failed `retry_count`
/// times. Indexed by max(0, retry_count - 1), saturating at the last entry.
pub fn backoff_delay(backoff_secs: &[u64], retry_count: u32) -> Duration {
    let Some(last) = backoff_secs.len().checked_sub(1) else {
        return Duration::ZERO;
    };
    let idx = (retry_count.saturating_sub(1) as usize).min(last);
    Duration::from_secs(backoff_secs[idx])
}

/// Whether a queued record may be attempted at `now`.
pub fn is_retry_eligible(record: &MemoryRecord, backoff_secs: &[u64], now: DateTime<Utc>) -> bool {
    match record.embedding_status {
        EmbeddingStatus::Pending => true,
        EmbeddingStatus::Retry => match record.last_retry_at {
            None => true,
            Some(last) => {
                let Ok(delay) = chrono::Duration::from_std(backoff_delay(backoff_secs, record.retry_count))
                else {
                    return false;
                };
                last.checked_add_signed(delay).is_some_and(|due| now >= due)
            }
        },
        EmbeddingStatus::Failed | EmbeddingStatus::Success => false,
    }
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Embedded,
    /// Failed; will be retried after backoff.
    Deferred,
    /// Failed for the last time.
    Exhausted,
}

/// Summary of one [`RetryManager::process_batch`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetryBatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub deferred: usize,
    pub exhausted: usize,
    /// Queued records still waiting out their backoff.
    pub skipped: usize,
    pub errors: usize,
    pub provider_unavailable: bool,
}

/// Drains the embedding queue one bounded batch at a time.
#[derive(Clone)]
pub struct RetryManager {
    store: Arc<dyn IMemoryStore>,
    provider: Arc<dyn IEmbeddingProvider>,
    loader: Option<Arc<dyn IContentLoader>>,
    batch_size: usize,
    max_retries: u32,
    backoff_secs: Vec<u64>,
}

impl RetryManager {
    pub fn new(
        store: Arc<dyn IMemoryStore>,
        provider: Arc<dyn IEmbeddingProvider>,
        loader: Option<Arc<dyn IContentLoader>>,
        config: &MaintenanceConfig,
    ) -> Self {
        Self {
            store,
            provider,
            loader,
            batch_size: config.retry_batch_size,
            max_retries: config.max_retries,
            backoff_secs: config.backoff_secs.clone(),
        }
    }

    /// Attempt up to `retry_batch_size` eligible records.
    pub fn process_batch(&self, now: DateTime<Utc>) -> RecallResult<RetryBatchReport> {
        let mut report = RetryBatchReport::default();
        if !self.provider.is_available() {
            debug!(provider = self.provider.name(), "embedding provider unavailable, batch skipped");
            report.provider_unavailable = true;
            return Ok(report);
        }

        let scan = self.batch_size.saturating_mul(QUEUE_SCAN_FACTOR);
        let queue = self.store.embedding_queue(scan, self.max_retries)?;
        let (eligible, waiting): (Vec<_>, Vec<_>) = queue
            .iter()
            .partition(|r| is_retry_eligible(r, &self.backoff_secs, now));
        report.skipped = waiting.len();

        for record in eligible.into_iter().take(self.batch_size) {
            report.attempted += 1;
            match self.attempt(record, now) {
                Ok(AttemptOutcome::Embedded) => report.succeeded += 1,
                Ok(AttemptOutcome::Deferred) => report.deferred += 1,
                Ok(AttemptOutcome::Exhausted) => report.exhausted += 1,
                Err(e) => {
                    warn!(memory_id = record.id, error = %e, "embedding retry bookkeeping failed");
                    report.errors += 1;
                }
            }
        }

        if report.attempted > 0 {
            info!(
                attempted = report.attempted,
                succeeded = report.succeeded,
                deferred = report.deferred,
                exhausted = report.exhausted,
                "embedding retry batch processed"
            );
        }
        Ok(report)
    }

    /// One embedding attempt. A missing vector and a content-load failure
    /// both count as failed attempts.
    pub fn attempt(&self, record: &MemoryRecord, now: DateTime<Utc>) -> RecallResult<AttemptOutcome> {
        let text = match self.resolve_text(record) {
            Ok(Some(text)) => text,
            Ok(None) => return self.fail(record, "content unavailable", now),
            Err(e) => return self.fail(record, &e.to_string(), now),
        };

        match self.provider.embed(&text) {
            Ok(Some(vector)) if !vector.is_empty() => {
                self.store.store_embedding(record.id, &vector, now)?;
                debug!(memory_id = record.id, dims = vector.len(), "embedding stored");
                Ok(AttemptOutcome::Embedded)
            }
            Ok(_) => self.fail(record, "provider returned no embedding", now),
            Err(e) => self.fail(record, &e.to_string(), now),
        }
    }

    fn resolve_text(&self, record: &MemoryRecord) -> RecallResult<Option<String>> {
        if !record.content.trim().is_empty() {
            return Ok(Some(record.content.clone()));
        }
        match &self.loader {
            Some(loader) => Ok(loader.load(record)?.filter(|t| !t.trim().is_empty())),
            None => Ok(None),
        }
    }

    fn fail(&self, record: &MemoryRecord, reason: &str, now: DateTime<Utc>) -> RecallResult<AttemptOutcome> {
        let status = self
            .store
            .record_embedding_failure(record.id, reason, self.max_retries, now)?;
        if status == EmbeddingStatus::Failed {
            events::retry_exhausted(record.id, record.retry_count.saturating_add(1), reason);
            Ok(AttemptOutcome::Exhausted)
        } else {
            debug!(memory_id = record.id, reason, "embedding attempt failed, will retry");
            Ok(AttemptOutcome::Deferred)
        }
    }

    pub fn retry_stats(&self) -> RecallResult<EmbeddingStats> {
        self.store.embedding_stats()
    }

    pub fn failed(&self) -> RecallResult<Vec<MemoryRecord>> {
        self.store.failed_embeddings()
    }

    /// Re-queue a permanently failed record. False if it was not failed.
    pub fn reset_for_retry(&self, memory_id: i64, now: DateTime<Utc>) -> RecallResult<bool> {
        let reset = self.store.reset_for_retry(memory_id, now)?;
        if reset {
            info!(memory_id, "embedding re-queued");
        }
        Ok(reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BACKOFF: [u64; 3] = [60, 300, 900];

    #[test]
    fn backoff_schedule() {
        assert_eq!(backoff_delay(&BACKOFF, 0), Duration::from_secs(60));
        assert_eq!(backoff_delay(&BACKOFF, 1), Duration::from_secs(60));
        assert_eq!(backoff_delay(&BACKOFF, 2), Duration::from_secs(300));
        assert_eq!(backoff_delay(&BACKOFF, 3), Duration::from_secs(900));
        assert_eq!(backoff_delay(&BACKOFF, 9), Duration::from_secs(900));
        assert_eq!(backoff_delay(&[], 2), Duration::ZERO);
    }

    #[test]
    fn eligibility_waits_out_the_backoff() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let mut record = MemoryRecord::new("c", "t", "body", now);
        assert!(is_retry_eligible(&record, &BACKOFF, now));

        record.embedding_status = EmbeddingStatus::Retry;
        record.retry_count = 2;
        record.last_retry_at = Some(now - chrono::Duration::seconds(299));
        assert!(!is_retry_eligible(&record, &BACKOFF, now));
        record.last_retry_at = Some(now - chrono::Duration::seconds(300));
        assert!(is_retry_eligible(&record, &BACKOFF, now));

        record.embedding_status = EmbeddingStatus::Failed;
        assert!(!is_retry_eligible(&record, &BACKOFF, now));
    }
}
