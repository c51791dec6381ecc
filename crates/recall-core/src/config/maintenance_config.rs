use serde::{Deserialize, Serialize};

use super::defaults;

/// Background maintenance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub archival_enabled: bool,
    pub archival_interval_secs: u64,
    pub archival_batch_size: usize,
    pub retry_enabled: bool,
    pub retry_interval_secs: u64,
    pub retry_batch_size: usize,
    /// Attempts after which an embedding is permanently failed.
    pub max_retries: u32,
    /// Delay before retry N+1, indexed by max(0, retry_count - 1).
    pub backoff_secs: Vec<u64>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            archival_enabled: true,
            archival_interval_secs: defaults::DEFAULT_ARCHIVAL_INTERVAL_SECS,
            archival_batch_size: defaults::DEFAULT_ARCHIVAL_BATCH_SIZE,
            retry_enabled: true,
            retry_interval_secs: defaults::DEFAULT_RETRY_INTERVAL_SECS,
            retry_batch_size: defaults::DEFAULT_RETRY_BATCH_SIZE,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            backoff_secs: defaults::DEFAULT_BACKOFF_SECS.to_vec(),
        }
    }
}
