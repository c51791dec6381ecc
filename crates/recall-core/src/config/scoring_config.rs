use serde::{Deserialize, Serialize};

use super::defaults;

/// Which composite model the scorer runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    /// Similarity, importance, recency, popularity, tier boost, retrievability.
    #[default]
    SixFactor,
    /// Temporal, usage, importance, pattern, citation.
    FiveFactor,
}

/// Weights of the six-factor model. Sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub importance: f64,
    pub recency: f64,
    pub popularity: f64,
    pub tier_boost: f64,
    pub retrievability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 0.30,
            importance: 0.25,
            recency: 0.10,
            popularity: 0.15,
            tier_boost: 0.05,
            retrievability: 0.15,
        }
    }
}

/// Weights of the five-factor model. Sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiveFactorWeights {
    pub temporal: f64,
    pub usage: f64,
    pub importance: f64,
    pub pattern: f64,
    pub citation: f64,
}

impl Default for FiveFactorWeights {
    fn default() -> Self {
        Self {
            temporal: 0.25,
            usage: 0.15,
            importance: 0.25,
            pattern: 0.20,
            citation: 0.15,
        }
    }
}

/// Composite scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub model: ScoringModel,
    /// Token-Jaccard similarity at which two siblings interfere.
    pub interference_threshold: f64,
    /// Penalty per interfering sibling.
    pub interference_penalty: f64,
    pub novelty_boost_max: f64,
    /// e-folding time of the novelty boost.
    pub novelty_decay_hours: f64,
    /// Age after which the novelty boost is zero.
    pub novelty_window_hours: f64,
    /// Final score cap whenever a novelty boost was applied.
    pub novelty_score_cap: f64,
    pub weights: ScoringWeights,
    pub five_factor_weights: FiveFactorWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model: ScoringModel::default(),
            interference_threshold: defaults::DEFAULT_INTERFERENCE_THRESHOLD,
            interference_penalty: defaults::DEFAULT_INTERFERENCE_PENALTY,
            novelty_boost_max: defaults::DEFAULT_NOVELTY_BOOST_MAX,
            novelty_decay_hours: defaults::DEFAULT_NOVELTY_DECAY_HOURS,
            novelty_window_hours: defaults::DEFAULT_NOVELTY_WINDOW_HOURS,
            novelty_score_cap: defaults::DEFAULT_NOVELTY_SCORE_CAP,
            weights: ScoringWeights::default(),
            five_factor_weights: FiveFactorWeights::default(),
        }
    }
}
