//! Effective half-life resolution.
//!
//! Priority: explicit per-record override, then the memory-type table, then
//! the tier default (no decay for protected tiers, 60 days otherwise).

use recall_core::constants::{DEFAULT_STABILITY, DEFAULT_TIER_HALF_LIFE_DAYS};
use recall_core::memory::{half_life_days, MemoryRecord};

use crate::formula::half_life_to_stability;

/// Effective half-life in days. `None` means the record never decays.
pub fn effective_half_life(record: &MemoryRecord) -> Option<f64> {
    if let Some(days) = record.half_life_days.filter(|d| *d > 0.0) {
        return Some(days);
    }
    if let Some(memory_type) = record.memory_type {
        return half_life_days(memory_type);
    }
    if record.tier.is_protected() {
        None
    } else {
        Some(DEFAULT_TIER_HALF_LIFE_DAYS)
    }
}

/// Stored stability, falling back to the default for missing or invalid values.
pub fn earned_stability(record: &MemoryRecord) -> f64 {
    record
        .stability
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_STABILITY)
}

/// max(earned stability, half-life baseline).
pub fn effective_stability(record: &MemoryRecord) -> f64 {
    let baseline = half_life_to_stability(effective_half_life(record));
    earned_stability(record).max(baseline)
}
