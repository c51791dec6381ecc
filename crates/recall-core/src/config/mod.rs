//! Configuration. Built once at startup, immutable afterwards, and passed
//! explicitly to every stage.

pub mod chunking_config;
pub mod decay_config;
pub mod defaults;
pub mod flags;
pub mod maintenance_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod scoring_config;
pub mod storage_config;
pub mod validation_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use chunking_config::ChunkingConfig;
pub use decay_config::{DecayConfig, StateLimits};
pub use flags::FeatureFlags;
pub use maintenance_config::MaintenanceConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use scoring_config::{FiveFactorWeights, ScoringConfig, ScoringModel, ScoringWeights};
pub use storage_config::StorageConfig;
pub use validation_config::ValidationConfig;

use crate::errors::{RecallError, RecallResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub flags: FeatureFlags,
    pub scoring: ScoringConfig,
    pub retrieval: RetrievalConfig,
    pub decay: DecayConfig,
    pub validation: ValidationConfig,
    pub chunking: ChunkingConfig,
    pub maintenance: MaintenanceConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl RecallConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(toml_str: &str) -> RecallResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| RecallError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then overlay feature flags from the environment.
    /// A missing path yields the defaults.
    pub fn load(path: Option<&Path>) -> RecallResult<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    RecallError::ConfigError(format!("{}: {e}", path.display()))
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Overlay `RECALL_*` feature-flag variables from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        self.flags = self.flags.with_env_overrides();
        self
    }

    /// Reject values that would make a stage ill-defined.
    pub fn validate(&self) -> RecallResult<()> {
        let chunking = &self.chunking;
        if chunking.target_chars == 0 || chunking.target_chars > chunking.max_chars {
            return Err(RecallError::ConfigError(format!(
                "chunk target {} must be in 1..={}",
                chunking.target_chars, chunking.max_chars
            )));
        }
        if !(0.0..=1.0).contains(&chunking.thinning_threshold) {
            return Err(RecallError::ConfigError(format!(
                "thinning threshold {} outside [0, 1]",
                chunking.thinning_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.scoring.interference_threshold) {
            return Err(RecallError::ConfigError(format!(
                "interference threshold {} outside [0, 1]",
                self.scoring.interference_threshold
            )));
        }
        if self.retrieval.rrf_k == 0 {
            return Err(RecallError::ConfigError("rrf_k must be positive".into()));
        }
        if self.maintenance.backoff_secs.is_empty() {
            return Err(RecallError::ConfigError(
                "backoff schedule must have at least one delay".into(),
            ));
        }
        Ok(())
    }
}
