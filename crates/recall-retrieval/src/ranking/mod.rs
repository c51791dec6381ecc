//! Ranking: composite scoring, adjustments, normalization, truncation.

pub mod budget;
pub mod interference;
pub mod normalize;
pub mod novelty;
pub mod scorer;
pub mod truncation;

use serde::Serialize;

use recall_core::memory::{DecayState, MemoryRecord};

use crate::fusion::{Channel, FusionResult};
use scorer::ScoreBreakdown;

/// Anything carrying a ranking score.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for f64 {
    fn score(&self) -> f64 {
        *self
    }
}

impl Scored for (i64, f64) {
    fn score(&self) -> f64 {
        self.1
    }
}

impl Scored for FusionResult {
    fn score(&self) -> f64 {
        self.score
    }
}

/// A candidate after composite scoring.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub record: MemoryRecord,
    /// Composite score, normalized when score normalization is on.
    pub score: f64,
    pub fusion_score: f64,
    pub sources: Vec<Channel>,
    pub promoted_from: Option<Channel>,
    pub state: DecayState,
    pub retrievability: f64,
    pub breakdown: ScoreBreakdown,
}

impl Scored for ScoredResult {
    fn score(&self) -> f64 {
        self.score
    }
}

/// Score descending, id ascending on ties.
pub fn sort_scored(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.record.id.cmp(&b.record.id)));
}
