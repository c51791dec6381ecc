//! Five-state tier classifier.
//!
//! Every read derives a [`DecayState`] from FSRS retrievability. Pinned and
//! protected records are always HOT with R = 1.0. Otherwise a record older
//! than the archive age whose R is below the archive floor is ARCHIVED, and
//! the remaining states follow the HOT/WARM/COLD thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::config::defaults::{
    DEFAULT_COLD_THRESHOLD, DEFAULT_HOT_THRESHOLD, DEFAULT_WARM_THRESHOLD,
};
use recall_core::config::{DecayConfig, StateLimits};
use recall_core::memory::{DecayState, MemoryRecord};

use crate::formula::{elapsed_days, retrievability};
use crate::half_life::{effective_half_life, effective_stability};

/// Retrievability thresholds for HOT, WARM, and COLD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateThresholds {
    pub hot: f64,
    pub warm: f64,
    pub cold: f64,
}

impl Default for StateThresholds {
    fn default() -> Self {
        Self {
            hot: DEFAULT_HOT_THRESHOLD,
            warm: DEFAULT_WARM_THRESHOLD,
            cold: DEFAULT_COLD_THRESHOLD,
        }
    }
}

impl StateThresholds {
    /// Build thresholds, falling back to the defaults when they are not
    /// strictly ordered hot > warm > cold within (0, 1].
    pub fn validated(hot: f64, warm: f64, cold: f64) -> Self {
        let in_range = |v: f64| v > 0.0 && v <= 1.0;
        if in_range(hot) && in_range(warm) && in_range(cold) && hot > warm && warm > cold {
            return Self { hot, warm, cold };
        }
        tracing::warn!(
            hot,
            warm,
            cold,
            "invalid state thresholds; using defaults"
        );
        Self::default()
    }
}

/// Outcome of classifying one record at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub state: DecayState,
    pub retrievability: f64,
    /// `None` when the record never decays.
    pub effective_half_life: Option<f64>,
    pub elapsed_days: f64,
}

/// A record paired with its classification.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a MemoryRecord,
    pub classification: Classification,
}

/// Record counts per state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStats {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub dormant: usize,
    pub archived: usize,
    pub total: usize,
}

impl StateStats {
    pub fn get(&self, state: DecayState) -> usize {
        match state {
            DecayState::Hot => self.hot,
            DecayState::Warm => self.warm,
            DecayState::Cold => self.cold,
            DecayState::Dormant => self.dormant,
            DecayState::Archived => self.archived,
        }
    }

    fn bump(&mut self, state: DecayState) {
        match state {
            DecayState::Hot => self.hot += 1,
            DecayState::Warm => self.warm += 1,
            DecayState::Cold => self.cold += 1,
            DecayState::Dormant => self.dormant += 1,
            DecayState::Archived => self.archived += 1,
        }
        self.total += 1;
    }
}

/// Classifies records into decay states.
#[derive(Debug, Clone)]
pub struct TierClassifier {
    thresholds: StateThresholds,
    archive_after_days: f64,
    archive_retrievability: f64,
    limits: StateLimits,
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self::new(&DecayConfig::default())
    }
}

impl TierClassifier {
    pub fn new(config: &DecayConfig) -> Self {
        Self {
            thresholds: StateThresholds::validated(
                config.hot_threshold,
                config.warm_threshold,
                config.cold_threshold,
            ),
            archive_after_days: config.archive_after_days,
            archive_retrievability: config.archive_retrievability,
            limits: config.state_limits,
        }
    }

    pub fn thresholds(&self) -> StateThresholds {
        self.thresholds
    }

    /// Map a retrievability and age to a state, ignoring pin and tier.
    pub fn state_for(&self, retrievability: f64, elapsed_days: f64) -> DecayState {
        if elapsed_days > self.archive_after_days && retrievability < self.archive_retrievability {
            DecayState::Archived
        } else if retrievability >= self.thresholds.hot {
            DecayState::Hot
        } else if retrievability >= self.thresholds.warm {
            DecayState::Warm
        } else if retrievability >= self.thresholds.cold {
            DecayState::Cold
        } else {
            DecayState::Dormant
        }
    }

    /// Classify one record at `now`.
    pub fn classify(&self, record: &MemoryRecord, now: DateTime<Utc>) -> Classification {
        let half_life = effective_half_life(record);
        // An anchor later than `now` counts as just reviewed.
        let elapsed = elapsed_days(record.decay_anchor(), now).max(0.0);

        if record.is_decay_exempt() || half_life.is_none() {
            return Classification {
                state: DecayState::Hot,
                retrievability: 1.0,
                effective_half_life: half_life,
                elapsed_days: elapsed,
            };
        }

        let r = retrievability(effective_stability(record), elapsed);
        Classification {
            state: self.state_for(r, elapsed),
            retrievability: r,
            effective_half_life: half_life,
            elapsed_days: elapsed,
        }
    }

    /// Retrievability alone, for the composite scorer.
    pub fn retrievability(&self, record: &MemoryRecord, now: DateTime<Utc>) -> f64 {
        self.classify(record, now).retrievability
    }

    /// Whether the archival sweep should archive this record.
    pub fn should_archive(&self, record: &MemoryRecord, now: DateTime<Utc>) -> bool {
        if record.is_decay_exempt() {
            return false;
        }
        matches!(
            self.classify(record, now).state,
            DecayState::Archived | DecayState::Dormant
        )
    }

    pub fn state_stats(&self, records: &[MemoryRecord], now: DateTime<Utc>) -> StateStats {
        let mut stats = StateStats::default();
        for record in records {
            stats.bump(self.classify(record, now).state);
        }
        stats
    }

    /// Classify, group by state, and cap the result.
    ///
    /// With a `target` state only that state is kept. Without one, each state
    /// keeps up to its configured limit; slots a state leaves unused go to
    /// overflowing states in priority order. Within a state records are
    /// ordered by descending retrievability. The output never exceeds `limit`.
    pub fn filter_and_limit_by_state<'a>(
        &self,
        records: &'a [MemoryRecord],
        target: Option<DecayState>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<ClassifiedRecord<'a>> {
        let mut classified: Vec<ClassifiedRecord<'a>> = records
            .iter()
            .map(|record| ClassifiedRecord {
                record,
                classification: self.classify(record, now),
            })
            .collect();
        classified.sort_by(|a, b| {
            b.classification
                .retrievability
                .total_cmp(&a.classification.retrievability)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });

        if let Some(state) = target {
            classified.retain(|c| c.classification.state == state);
            classified.truncate(limit);
            return classified;
        }

        let mut by_state: Vec<Vec<ClassifiedRecord<'a>>> =
            DecayState::PRIORITY.iter().map(|_| Vec::new()).collect();
        for item in classified {
            let slot = state_slot(item.classification.state);
            by_state[slot].push(item);
        }

        let mut surplus: usize = DecayState::PRIORITY
            .iter()
            .zip(&by_state)
            .map(|(state, group)| self.limit_for(*state).saturating_sub(group.len()))
            .sum();

        let mut result = Vec::new();
        for (state, group) in DecayState::PRIORITY.iter().zip(by_state) {
            let base = self.limit_for(*state);
            let overflow = group.len().saturating_sub(base);
            let extra = overflow.min(surplus);
            surplus -= extra;
            result.extend(group.into_iter().take(base + extra));
        }
        result.truncate(limit);
        result
    }

    fn limit_for(&self, state: DecayState) -> usize {
        match state {
            DecayState::Hot => self.limits.hot,
            DecayState::Warm => self.limits.warm,
            DecayState::Cold => self.limits.cold,
            DecayState::Dormant => self.limits.dormant,
            DecayState::Archived => self.limits.archived,
        }
    }
}

fn state_slot(state: DecayState) -> usize {
    match state {
        DecayState::Hot => 0,
        DecayState::Warm => 1,
        DecayState::Cold => 2,
        DecayState::Dormant => 3,
        DecayState::Archived => 4,
    }
}
