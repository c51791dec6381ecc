//! Composite relevance scorer.
//!
//! Six-factor model (default): similarity, importance, recency, popularity,
//! tier boost, retrievability. Five-factor model: temporal, usage,
//! importance, pattern alignment, citation recency. Both produce a base
//! score in [0, 1]; the novelty boost and interference penalty are then
//! applied, each behind its own flag.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recall_core::config::{FeatureFlags, ScoringConfig, ScoringModel};
use recall_core::constants::{DEFAULT_IMPORTANCE_WEIGHT, DEFAULT_STABILITY, MS_PER_DAY};
use recall_core::memory::{ImportanceTier, MemoryRecord};
use recall_decay::formula::retrievability;

use super::interference::apply_interference_penalty;
use super::novelty::{apply_novelty, novelty_boost};

const RECENCY_DECAY_RATE: f64 = 0.10;
const NEUTRAL: f64 = 0.5;
const USAGE_STEP: f64 = 0.05;
const USAGE_CAP: f64 = 1.5;
const CITATION_DECAY_RATE: f64 = 0.1;
const CITATION_MAX_DAYS: f64 = 90.0;
const EXACT_TITLE_MATCH: f64 = 0.3;
const PARTIAL_TITLE_MATCH: f64 = 0.15;
const SEMANTIC_THRESHOLD: f64 = 0.8;

/// Transient projection of a candidate for scoring. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringInput {
    /// 0–100.
    pub similarity: f64,
    pub importance_weight: Option<f64>,
    pub tier: ImportanceTier,
    pub stability: Option<f64>,
    /// Precomputed retrievability from the tier classifier. When absent it is
    /// derived from `stability` and the timestamps.
    pub retrievability: Option<f64>,
    pub last_review: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub interference_count: u32,
    pub access_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub title: String,
}

impl Default for ScoringInput {
    fn default() -> Self {
        Self {
            similarity: 0.0,
            importance_weight: None,
            tier: ImportanceTier::Normal,
            stability: None,
            retrievability: None,
            last_review: None,
            updated_at: None,
            created_at: None,
            interference_count: 0,
            access_count: 0,
            last_accessed: None,
            title: String::new(),
        }
    }
}

impl ScoringInput {
    pub fn from_record(record: &MemoryRecord, similarity: f64) -> Self {
        Self {
            similarity,
            importance_weight: Some(record.importance_weight),
            tier: record.tier,
            stability: record.stability,
            retrievability: None,
            last_review: record.last_review,
            updated_at: Some(record.updated_at),
            created_at: Some(record.created_at),
            interference_count: 0,
            access_count: record.access_count,
            last_accessed: record.last_accessed,
            title: record.title.clone(),
        }
    }

    pub fn with_retrievability(mut self, r: f64) -> Self {
        self.retrievability = Some(r);
        self
    }

    pub fn with_interference(mut self, count: u32) -> Self {
        self.interference_count = count;
        self
    }
}

/// One factor's share of the base score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorDetail {
    pub name: &'static str,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl FactorDetail {
    fn new(name: &'static str, value: f64, weight: f64) -> Self {
        Self {
            name,
            value,
            weight,
            contribution: value * weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub model: ScoringModel,
    pub factors: Vec<FactorDetail>,
    /// Weighted sum, clamped to [0, 1].
    pub base: f64,
    pub novelty_boost: f64,
    /// Amount actually subtracted.
    pub interference_penalty: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn factor(&self, name: &str) -> Option<&FactorDetail> {
        self.factors.iter().find(|f| f.name == name)
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_DAY
}

pub fn similarity_factor(similarity: f64) -> f64 {
    if similarity.is_finite() {
        (similarity / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Stored importance weight; missing, zero, or invalid means 0.5.
pub fn importance_factor(weight: Option<f64>) -> f64 {
    match weight {
        Some(w) if w.is_finite() && w > 0.0 => w.min(1.0),
        _ => DEFAULT_IMPORTANCE_WEIGHT,
    }
}

/// `1 / (1 + days · 0.1)`. Constitutional records and future timestamps
/// score 1.0; a missing timestamp is neutral.
pub fn recency_score(timestamp: Option<DateTime<Utc>>, tier: ImportanceTier, now: DateTime<Utc>) -> f64 {
    if tier == ImportanceTier::Constitutional {
        return 1.0;
    }
    let Some(ts) = timestamp else {
        return NEUTRAL;
    };
    let days = days_between(ts, now);
    if days < 0.0 {
        return 1.0;
    }
    1.0 / (1.0 + days * RECENCY_DECAY_RATE)
}

/// Access-count boost `min(1.5, 1 + n · 0.05)` mapped onto [0, 1].
pub fn usage_score(access_count: u64) -> f64 {
    let boost = (1.0 + access_count as f64 * USAGE_STEP).min(USAGE_CAP);
    (boost - 1.0) / (USAGE_CAP - 1.0)
}

/// FSRS retrievability from the earned stability (default 1.0) and the decay
/// clock. No timestamp at all is neutral.
pub fn retrievability_score(input: &ScoringInput, now: DateTime<Utc>) -> f64 {
    if let Some(r) = input.retrievability.filter(|r| r.is_finite()) {
        return r.clamp(0.0, 1.0);
    }
    let stability = input
        .stability
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_STABILITY);
    let Some(anchor) = input.last_review.or(input.updated_at).or(input.created_at) else {
        return NEUTRAL;
    };
    retrievability(stability, days_between(anchor, now).max(0.0))
}

/// Weight scaled by the tier's importance multiplier, halved, capped at 1.
pub fn tier_importance_score(tier: ImportanceTier, weight: Option<f64>) -> f64 {
    (importance_factor(weight) * tier.importance_multiplier() / 2.0).min(1.0)
}

/// Citation recency from last access (else last update). Zero after 90 days.
pub fn citation_score(input: &ScoringInput, now: DateTime<Utc>) -> f64 {
    let Some(cited) = input.last_accessed.or(input.updated_at) else {
        return NEUTRAL;
    };
    let days = days_between(cited, now).max(0.0);
    if days >= CITATION_MAX_DAYS {
        return 0.0;
    }
    1.0 / (1.0 + days * CITATION_DECAY_RATE)
}

/// Query/title alignment plus a share of similarity.
pub fn pattern_score(similarity: f64, title: &str, query: Option<&str>) -> f64 {
    let sim = similarity_factor(similarity);
    let mut score = sim * 0.5;

    let query = query.map(str::to_lowercase).unwrap_or_default();
    if !title.is_empty() && !query.is_empty() {
        let title = title.to_lowercase();
        if title.contains(&query) || query.contains(&title) {
            score += EXACT_TITLE_MATCH;
        } else {
            let query_words: Vec<&str> = query
                .split_whitespace()
                .filter(|w| w.chars().count() > 2)
                .collect();
            let title_words: Vec<&str> = title.split_whitespace().collect();
            let matched = query_words
                .iter()
                .filter(|q| title_words.iter().any(|t| t.contains(*q)))
                .count();
            if matched > 0 {
                score += PARTIAL_TITLE_MATCH * matched as f64 / query_words.len() as f64;
            }
        }
    }

    if sim >= SEMANTIC_THRESHOLD {
        score += (sim - SEMANTIC_THRESHOLD) * 0.5;
    }
    score.clamp(0.0, 1.0)
}

/// Scores candidates under a fixed configuration and flag set.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    config: ScoringConfig,
    flags: FeatureFlags,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default(), FeatureFlags::default())
    }
}

impl CompositeScorer {
    pub fn new(config: &ScoringConfig, flags: FeatureFlags) -> Self {
        Self {
            config: config.clone(),
            flags,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    /// Final score in [0, 1], or [0, cap] when a novelty boost applied.
    pub fn score(&self, input: &ScoringInput, query: Option<&str>, now: DateTime<Utc>) -> f64 {
        self.breakdown(input, query, now).total
    }

    pub fn breakdown(&self, input: &ScoringInput, query: Option<&str>, now: DateTime<Utc>) -> ScoreBreakdown {
        let factors = match self.config.model {
            ScoringModel::SixFactor => self.six_factor(input, now),
            ScoringModel::FiveFactor => self.five_factor(input, query, now),
        };
        let sum: f64 = factors.iter().map(|f| f.contribution).sum();
        let base = if sum.is_finite() { sum.clamp(0.0, 1.0) } else { 0.0 };

        let novelty = if self.flags.novelty_boost {
            novelty_boost(input.created_at, now, &self.config)
        } else {
            0.0
        };
        let penalized = apply_interference_penalty(
            base,
            input.interference_count,
            self.config.interference_penalty,
            self.flags.interference_penalty,
        );
        // The boost is added exactly once, after the penalty.
        let total = apply_novelty(penalized, novelty, self.config.novelty_score_cap).clamp(0.0, 1.0);

        ScoreBreakdown {
            model: self.config.model,
            factors,
            base,
            novelty_boost: novelty,
            interference_penalty: base - penalized,
            total,
        }
    }

    fn six_factor(&self, input: &ScoringInput, now: DateTime<Utc>) -> Vec<FactorDetail> {
        let w = &self.config.weights;
        vec![
            FactorDetail::new("similarity", similarity_factor(input.similarity), w.similarity),
            FactorDetail::new("importance", importance_factor(input.importance_weight), w.importance),
            FactorDetail::new(
                "recency",
                recency_score(input.updated_at.or(input.created_at), input.tier, now),
                w.recency,
            ),
            FactorDetail::new("popularity", usage_score(input.access_count), w.popularity),
            FactorDetail::new("tier_boost", input.tier.value(), w.tier_boost),
            FactorDetail::new("retrievability", retrievability_score(input, now), w.retrievability),
        ]
    }

    fn five_factor(&self, input: &ScoringInput, query: Option<&str>, now: DateTime<Utc>) -> Vec<FactorDetail> {
        let w = &self.config.five_factor_weights;
        vec![
            FactorDetail::new("temporal", retrievability_score(input, now), w.temporal),
            FactorDetail::new("usage", usage_score(input.access_count), w.usage),
            FactorDetail::new(
                "importance",
                tier_importance_score(input.tier, input.importance_weight),
                w.importance,
            ),
            FactorDetail::new("pattern", pattern_score(input.similarity, &input.title, query), w.pattern),
            FactorDetail::new("citation", citation_score(input, now), w.citation),
        ]
    }
}
