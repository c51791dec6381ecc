//! ConfidenceTracker: records validation feedback and promotes records that
//! pass the [`PromotionPolicy`].

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use recall_core::config::ValidationConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{Confidence, ImportanceTier};
use recall_core::traits::IMemoryStore;
use recall_observability::{events, validation_span};

use crate::promotion::{PromotionPolicy, PromotionProgress};

/// Result of one validation event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub previous_confidence: f64,
    pub confidence: f64,
    pub validation_count: u32,
    /// Reported only; promotion is always an explicit call.
    pub promotion_eligible: bool,
}

impl ValidationOutcome {
    fn fallback() -> Self {
        Self {
            previous_confidence: Confidence::BASE,
            confidence: Confidence::BASE,
            validation_count: 0,
            promotion_eligible: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInfo {
    pub memory_id: i64,
    pub confidence: f64,
    pub validation_count: u32,
    pub tier: ImportanceTier,
    pub promotion_eligible: bool,
    pub progress: PromotionProgress,
}

/// Validation and promotion over a store.
pub struct ConfidenceTracker<'a> {
    store: &'a dyn IMemoryStore,
    policy: PromotionPolicy,
}

impl<'a> ConfidenceTracker<'a> {
    pub fn new(store: &'a dyn IMemoryStore, config: &ValidationConfig) -> Self {
        Self {
            store,
            policy: PromotionPolicy::from_config(config),
        }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    /// Apply one validation: confidence +0.10 when useful, −0.05 otherwise,
    /// and validation_count +1, atomically.
    pub fn try_record_validation(&self, memory_id: i64, useful: bool) -> RecallResult<ValidationOutcome> {
        let _span = validation_span!(memory_id).entered();
        let update = self
            .store
            .update_confidence(memory_id, &|c: Confidence| c.after_validation(useful))?;

        let outcome = ValidationOutcome {
            previous_confidence: update.previous.value(),
            confidence: update.current.value(),
            validation_count: update.validation_count,
            promotion_eligible: self
                .policy
                .is_eligible(update.current, update.validation_count, update.tier),
        };
        events::validation_recorded(
            memory_id,
            useful,
            outcome.previous_confidence,
            outcome.confidence,
            outcome.validation_count,
        );
        if outcome.promotion_eligible {
            debug!(memory_id, "memory is eligible for promotion");
        }
        Ok(outcome)
    }

    /// [`Self::try_record_validation`], degrading to confidence 0.5, count 0,
    /// not eligible on failure.
    pub fn record_validation(&self, memory_id: i64, useful: bool) -> ValidationOutcome {
        self.try_record_validation(memory_id, useful)
            .unwrap_or_else(|e| {
                events::degradation_triggered("record_validation", &e.to_string(), "base confidence");
                ValidationOutcome::fallback()
            })
    }

    pub fn try_confidence(&self, memory_id: i64) -> RecallResult<Confidence> {
        self.store
            .get(memory_id)?
            .map(|r| r.confidence)
            .ok_or(RecallError::NotFound { id: memory_id })
    }

    /// Stored confidence, or 0.5 when the record cannot be read.
    pub fn confidence(&self, memory_id: i64) -> f64 {
        match self.try_confidence(memory_id) {
            Ok(c) => c.value(),
            Err(e) => {
                events::degradation_triggered("confidence", &e.to_string(), "base confidence");
                Confidence::BASE
            }
        }
    }

    /// Whether the record currently passes the promotion gate. False on any failure.
    pub fn is_promotion_eligible(&self, memory_id: i64) -> bool {
        match self.store.get(memory_id) {
            Ok(Some(record)) => self.policy.record_eligible(&record),
            Ok(None) => false,
            Err(e) => {
                events::degradation_triggered("is_promotion_eligible", &e.to_string(), "not eligible");
                false
            }
        }
    }

    /// Rewrite the tier to critical if the record is eligible. The gate is
    /// re-checked inside the promotion transaction.
    ///
    /// `Ok(false)` means the record is already critical or constitutional; an
    /// ineligible record is `InvalidInput`.
    pub fn try_promote_to_critical(&self, memory_id: i64) -> RecallResult<bool> {
        let _span = validation_span!(memory_id).entered();
        let policy = self.policy;
        let from = Cell::new(ImportanceTier::Normal);
        let promoted = self.store.promote_if(memory_id, ImportanceTier::Critical, &|record| {
            from.set(record.tier);
            policy.record_eligible(record)
        })?;

        if promoted {
            events::memory_promoted(memory_id, from.get().as_str(), ImportanceTier::Critical.as_str());
            info!(memory_id, "memory promoted to critical tier");
            return Ok(true);
        }

        let record = self
            .store
            .get(memory_id)?
            .ok_or(RecallError::NotFound { id: memory_id })?;
        if record.tier.is_protected() {
            return Ok(false);
        }
        Err(RecallError::invalid(format!(
            "memory {memory_id} not eligible for promotion: requires confidence >= {} (current {}) \
             and validation_count >= {} (current {})",
            policy.confidence_required,
            record.confidence,
            policy.validations_required,
            record.validation_count
        )))
    }

    /// [`Self::try_promote_to_critical`], false on any failure.
    pub fn promote_to_critical(&self, memory_id: i64) -> bool {
        self.try_promote_to_critical(memory_id).unwrap_or_else(|e| {
            events::degradation_triggered("promote_to_critical", &e.to_string(), "not promoted");
            false
        })
    }

    pub fn try_confidence_info(&self, memory_id: i64) -> RecallResult<ConfidenceInfo> {
        let record = self
            .store
            .get(memory_id)?
            .ok_or(RecallError::NotFound { id: memory_id })?;
        Ok(ConfidenceInfo {
            memory_id,
            confidence: record.confidence.value(),
            validation_count: record.validation_count,
            tier: record.tier,
            promotion_eligible: self.policy.record_eligible(&record),
            progress: self.policy.progress(record.confidence, record.validation_count),
        })
    }

    /// Full confidence picture, or the safe default when the record cannot be read.
    pub fn confidence_info(&self, memory_id: i64) -> ConfidenceInfo {
        self.try_confidence_info(memory_id).unwrap_or_else(|e| {
            events::degradation_triggered("confidence_info", &e.to_string(), "base confidence");
            let base = Confidence::default();
            ConfidenceInfo {
                memory_id,
                confidence: base.value(),
                validation_count: 0,
                tier: ImportanceTier::Normal,
                promotion_eligible: false,
                progress: self.policy.progress(base, 0),
            }
        })
    }
}
