//! The promotion gate.

use serde::{Deserialize, Serialize};

use recall_core::config::ValidationConfig;
use recall_core::memory::{Confidence, ImportanceTier, MemoryRecord};

/// Absorbs accumulated floating-point error from repeated 0.1 steps.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Confidence and validation-count thresholds for promotion to critical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromotionPolicy {
    pub confidence_required: f64,
    pub validations_required: u32,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

/// How far a record is from the promotion gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromotionProgress {
    pub confidence_required: f64,
    pub validations_required: u32,
    pub confidence_met: bool,
    pub validations_met: bool,
}

impl PromotionPolicy {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            confidence_required: config.promotion_confidence,
            validations_required: config.promotion_validations,
        }
    }

    pub fn confidence_met(&self, confidence: Confidence) -> bool {
        confidence.value() + THRESHOLD_EPSILON >= self.confidence_required
    }

    pub fn validations_met(&self, validation_count: u32) -> bool {
        validation_count >= self.validations_required
    }

    /// Both thresholds met and the tier is not already critical or constitutional.
    pub fn is_eligible(&self, confidence: Confidence, validation_count: u32, tier: ImportanceTier) -> bool {
        !tier.is_protected() && self.confidence_met(confidence) && self.validations_met(validation_count)
    }

    pub fn record_eligible(&self, record: &MemoryRecord) -> bool {
        self.is_eligible(record.confidence, record.validation_count, record.tier)
    }

    pub fn progress(&self, confidence: Confidence, validation_count: u32) -> PromotionProgress {
        PromotionProgress {
            confidence_required: self.confidence_required,
            validations_required: self.validations_required,
            confidence_met: self.confidence_met(confidence),
            validations_met: self.validations_met(validation_count),
        }
    }
}
