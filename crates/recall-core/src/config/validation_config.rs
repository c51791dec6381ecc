use serde::{Deserialize, Serialize};

use super::defaults;

/// Promotion gate for the confidence tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub promotion_confidence: f64,
    pub promotion_validations: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            promotion_confidence: defaults::DEFAULT_PROMOTION_CONFIDENCE,
            promotion_validations: defaults::DEFAULT_PROMOTION_VALIDATIONS,
        }
    }
}
