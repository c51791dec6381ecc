//! FSRS review scheduling: grade a recall, update stability and difficulty,
//! and compute the next review date.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use recall_core::constants::{DEFAULT_DIFFICULTY, DEFAULT_STABILITY};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::MemoryRecord;
use recall_core::traits::IMemoryStore;

use crate::formula::{elapsed_days, optimal_interval, retrievability, DEFAULT_DESIRED_RETENTION};

pub const MIN_STABILITY: f64 = 0.1;
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Review grade, 1 (forgot) through 4 (effortless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Grade {
    fn stability_factor(self) -> f64 {
        match self {
            Self::Again => 0.2,
            Self::Hard => 0.8,
            Self::Good => 1.0,
            Self::Easy => 1.3,
        }
    }

    fn difficulty_delta(self) -> f64 {
        match self {
            Self::Again => 1.0,
            Self::Hard => 0.5,
            Self::Good => 0.0,
            Self::Easy => -0.5,
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = RecallError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(RecallError::invalid(format!("review grade {other} outside 1..=4"))),
        }
    }
}

/// FSRS scheduling state of one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FsrsParams {
    pub stability: f64,
    pub difficulty: f64,
    pub last_review: Option<DateTime<Utc>>,
    pub review_count: u32,
}

impl Default for FsrsParams {
    fn default() -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            difficulty: DEFAULT_DIFFICULTY,
            last_review: None,
            review_count: 0,
        }
    }
}

impl FsrsParams {
    pub fn from_record(record: &MemoryRecord) -> Self {
        Self {
            stability: record
                .stability
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(DEFAULT_STABILITY),
            difficulty: record.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            last_review: record.last_review,
            review_count: record.review_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub stability: f64,
    pub difficulty: f64,
    pub last_review: DateTime<Utc>,
    pub review_count: u32,
    pub next_review: DateTime<Utc>,
    /// Retrievability at the moment of review.
    pub retrievability: f64,
}

/// New stability after a review at retrievability `r`.
pub fn update_stability(stability: f64, difficulty: f64, grade: Grade, r: f64) -> f64 {
    if grade == Grade::Again {
        return (stability * grade.stability_factor()).max(MIN_STABILITY);
    }
    let difficulty_factor = 1.0 + (11.0 - difficulty) * 0.1;
    let retrievability_bonus = 1.0 + (1.0 - r) * 0.5;
    (stability * difficulty_factor * grade.stability_factor() * retrievability_bonus)
        .max(MIN_STABILITY)
}

pub fn update_difficulty(difficulty: f64, grade: Grade) -> f64 {
    (difficulty + grade.difficulty_delta()).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Next review date for a stability, at the default retention target.
pub fn next_review_date(stability: f64, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(i64::from(optimal_interval(stability, DEFAULT_DESIRED_RETENTION)))
}

/// Grade one review. Elapsed time before the first review counts as zero.
pub fn process_review(params: &FsrsParams, grade: Grade, now: DateTime<Utc>) -> ReviewResult {
    let elapsed = params
        .last_review
        .map(|at| elapsed_days(at, now).max(0.0))
        .unwrap_or(0.0);
    let r = retrievability(params.stability, elapsed);
    let stability = update_stability(params.stability, params.difficulty, grade, r);

    ReviewResult {
        stability,
        difficulty: update_difficulty(params.difficulty, grade),
        last_review: now,
        review_count: params.review_count.saturating_add(1),
        next_review: next_review_date(stability, now),
        retrievability: r,
    }
}

/// Load a record, grade the review, and persist the new FSRS state.
pub fn apply_review(
    store: &dyn IMemoryStore,
    id: i64,
    grade: Grade,
    now: DateTime<Utc>,
) -> RecallResult<ReviewResult> {
    let record = store.get(id)?.ok_or(RecallError::NotFound { id })?;
    let result = process_review(&FsrsParams::from_record(&record), grade, now);
    store.record_review(id, result.stability, result.difficulty, result.last_review)?;
    tracing::debug!(
        memory_id = id,
        grade = grade as u8,
        stability = result.stability,
        next_review = %result.next_review,
        "review recorded"
    );
    Ok(result)
}
