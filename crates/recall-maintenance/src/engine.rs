//! MaintenanceEngine: owns the retry and archival background tasks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use recall_core::config::{MaintenanceConfig, RecallConfig};
use recall_core::traits::{IContentLoader, IEmbeddingProvider, IMemoryStore};
use recall_observability::maintenance_span;

use crate::archival::{ArchivalStats, ArchivalSweep};
use crate::retry::RetryManager;
use crate::scheduler::ScheduledTask;

pub const RETRY_JOB: &str = "embedding_retry";
pub const ARCHIVAL_JOB: &str = "archival_sweep";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaintenanceStatus {
    pub retry_running: bool,
    pub archival_running: bool,
    pub retry_runs: u64,
    pub archival_runs: u64,
}

pub struct MaintenanceEngine {
    config: MaintenanceConfig,
    retry: RetryManager,
    archival: Arc<ArchivalSweep>,
    retry_task: ScheduledTask,
    archival_task: ScheduledTask,
}

impl MaintenanceEngine {
    pub fn new(
        store: Arc<dyn IMemoryStore>,
        provider: Arc<dyn IEmbeddingProvider>,
        loader: Option<Arc<dyn IContentLoader>>,
        config: &RecallConfig,
    ) -> Self {
        let retry = RetryManager::new(Arc::clone(&store), provider, loader, &config.maintenance);
        let archival = Arc::new(ArchivalSweep::new(store, &config.decay, &config.maintenance));
        Self {
            config: config.maintenance.clone(),
            retry,
            archival,
            retry_task: ScheduledTask::new(RETRY_JOB),
            archival_task: ScheduledTask::new(ARCHIVAL_JOB),
        }
    }

    pub fn retry_manager(&self) -> &RetryManager {
        &self.retry
    }

    pub fn archival(&self) -> &ArchivalSweep {
        &self.archival
    }

    pub fn archival_stats(&self) -> ArchivalStats {
        self.archival.stats()
    }

    /// Start every enabled job that is not already running. Must be called
    /// inside a tokio runtime. Returns how many tasks were started.
    pub fn start(&mut self) -> usize {
        let mut started = 0;

        if self.config.retry_enabled {
            let retry = self.retry.clone();
            let interval = Duration::from_secs(self.config.retry_interval_secs);
            if self.retry_task.start(interval, move || {
                let _span = maintenance_span!(RETRY_JOB).entered();
                if let Err(e) = retry.process_batch(Utc::now()) {
                    warn!(error = %e, "embedding retry batch failed");
                }
            }) {
                started += 1;
            }
        }

        if self.config.archival_enabled {
            let archival = Arc::clone(&self.archival);
            let interval = Duration::from_secs(self.config.archival_interval_secs);
            if self.archival_task.start(interval, move || {
                let _span = maintenance_span!(ARCHIVAL_JOB).entered();
                if let Err(e) = archival.run(Utc::now()) {
                    warn!(error = %e, "archival sweep failed");
                }
            }) {
                started += 1;
            }
        }

        if started > 0 {
            info!(started, "maintenance tasks started");
        }
        started
    }

    /// Stop both tasks and wait for in-flight batches. Safe to call twice.
    pub async fn shutdown(&mut self) {
        self.retry_task.shutdown().await;
        self.archival_task.shutdown().await;
        info!("maintenance tasks stopped");
    }

    pub fn status(&self) -> MaintenanceStatus {
        MaintenanceStatus {
            retry_running: self.retry_task.is_running(),
            archival_running: self.archival_task.is_running(),
            retry_runs: self.retry_task.run_count(),
            archival_runs: self.archival_task.run_count(),
        }
    }
}
