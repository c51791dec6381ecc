use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-state result limits for [`DecayConfig::state_limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateLimits {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub dormant: usize,
    pub archived: usize,
}

impl StateLimits {
    pub fn total(&self) -> usize {
        self.hot + self.warm + self.cold + self.dormant + self.archived
    }
}

impl Default for StateLimits {
    fn default() -> Self {
        Self {
            hot: defaults::DEFAULT_HOT_LIMIT,
            warm: defaults::DEFAULT_WARM_LIMIT,
            cold: defaults::DEFAULT_COLD_LIMIT,
            dormant: defaults::DEFAULT_DORMANT_LIMIT,
            archived: defaults::DEFAULT_ARCHIVED_LIMIT,
        }
    }
}

/// Tier classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Retrievability at or above which a record is HOT.
    pub hot_threshold: f64,
    pub warm_threshold: f64,
    pub cold_threshold: f64,
    /// Minimum age (days) before a record may be ARCHIVED.
    pub archive_after_days: f64,
    /// Retrievability below which an old record is ARCHIVED.
    pub archive_retrievability: f64,
    pub state_limits: StateLimits,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            hot_threshold: defaults::DEFAULT_HOT_THRESHOLD,
            warm_threshold: defaults::DEFAULT_WARM_THRESHOLD,
            cold_threshold: defaults::DEFAULT_COLD_THRESHOLD,
            archive_after_days: defaults::DEFAULT_ARCHIVE_AFTER_DAYS,
            archive_retrievability: defaults::DEFAULT_ARCHIVE_RETRIEVABILITY,
            state_limits: StateLimits::default(),
        }
    }
}
