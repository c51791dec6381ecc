//! Archival sweep: moves decayed records out of search.
//!
//! Candidates come from the store (unarchived, unpinned, unprotected); the
//! tier classifier makes the final call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use recall_core::config::{DecayConfig, MaintenanceConfig};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::traits::IMemoryStore;
use recall_decay::TierClassifier;
use recall_observability::events;

/// Errors retained in [`ArchivalStats::recent_errors`].
pub const MAX_RECENT_ERRORS: usize = 10;

/// Running totals across sweeps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchivalStats {
    pub last_scan: Option<DateTime<Utc>>,
    pub scanned: u64,
    pub archived: u64,
    pub unarchived: u64,
    pub errors: u64,
    /// Newest last.
    pub recent_errors: VecDeque<String>,
}

impl ArchivalStats {
    fn record_error(&mut self, err: &RecallError) {
        self.errors += 1;
        if self.recent_errors.len() == MAX_RECENT_ERRORS {
            self.recent_errors.pop_front();
        }
        self.recent_errors.push_back(err.to_string());
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub archived: usize,
    pub archived_ids: Vec<i64>,
}

pub struct ArchivalSweep {
    store: Arc<dyn IMemoryStore>,
    classifier: TierClassifier,
    batch_size: usize,
    stats: Mutex<ArchivalStats>,
}

impl ArchivalSweep {
    pub fn new(store: Arc<dyn IMemoryStore>, decay: &DecayConfig, maintenance: &MaintenanceConfig) -> Self {
        Self {
            store,
            classifier: TierClassifier::new(decay),
            batch_size: maintenance.archival_batch_size,
            stats: Mutex::new(ArchivalStats::default()),
        }
    }

    fn stats_guard(&self) -> MutexGuard<'_, ArchivalStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> ArchivalStats {
        self.stats_guard().clone()
    }

    /// Scan one batch and archive whatever the classifier says has decayed.
    pub fn run(&self, now: DateTime<Utc>) -> RecallResult<SweepReport> {
        let result = self.sweep(now);
        let mut stats = self.stats_guard();
        stats.last_scan = Some(now);
        match &result {
            Ok(report) => {
                stats.scanned += report.scanned as u64;
                stats.archived += report.archived as u64;
            }
            Err(e) => stats.record_error(e),
        }
        result
    }

    fn sweep(&self, now: DateTime<Utc>) -> RecallResult<SweepReport> {
        let candidates = self.store.archival_candidates(self.batch_size)?;
        let decayed: Vec<_> = candidates
            .iter()
            .filter(|r| self.classifier.should_archive(r, now))
            .map(|r| (r.id, self.classifier.classify(r, now)))
            .collect();

        let ids: Vec<i64> = decayed.iter().map(|(id, _)| *id).collect();
        let archived = if ids.is_empty() {
            0
        } else {
            self.store.set_archived(&ids, true)?
        };

        for (id, class) in &decayed {
            let reason = format!("{} (retrievability {:.3})", class.state, class.retrievability);
            events::memory_archived(*id, &reason);
        }
        if archived > 0 {
            info!(scanned = candidates.len(), archived, "archival sweep archived records");
        } else {
            debug!(scanned = candidates.len(), "archival sweep found nothing to archive");
        }

        Ok(SweepReport {
            scanned: candidates.len(),
            archived,
            archived_ids: ids,
        })
    }

    /// Restore records to search. Returns how many changed.
    pub fn unarchive(&self, ids: &[i64]) -> RecallResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self.store.set_archived(ids, false);
        let mut stats = self.stats_guard();
        match &result {
            Ok(n) => {
                stats.unarchived += *n as u64;
                for id in ids {
                    events::memory_unarchived(*id);
                }
            }
            Err(e) => stats.record_error(e),
        }
        result
    }
}
