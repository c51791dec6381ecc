use serde::{Deserialize, Serialize};

use super::defaults;

/// Fusion, representation, and truncation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// RRF k-value for rank fusion.
    pub rrf_k: u32,
    /// Bonus per additional source that returned the same id.
    pub convergence_bonus: f64,
    /// Weight of the graph channel when the list carries none.
    pub graph_weight_boost: f64,
    /// Minimum raw score for a channel-representation promotion.
    pub channel_quality_floor: f64,
    /// Bonus per query term found in a result's text.
    pub term_match_bonus: f64,
    /// Size of the fused set handed to scoring.
    pub top_k: usize,
    /// Token budget for the final result set.
    pub token_budget: usize,
    /// Confidence truncation never cuts below this many results.
    pub truncation_min_results: usize,
    /// A gap larger than median × multiplier is a cutoff.
    pub truncation_gap_multiplier: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            convergence_bonus: defaults::DEFAULT_CONVERGENCE_BONUS,
            graph_weight_boost: defaults::DEFAULT_GRAPH_WEIGHT_BOOST,
            channel_quality_floor: defaults::DEFAULT_CHANNEL_QUALITY_FLOOR,
            term_match_bonus: defaults::DEFAULT_TERM_MATCH_BONUS,
            top_k: defaults::DEFAULT_TOP_K,
            token_budget: defaults::DEFAULT_TOKEN_BUDGET,
            truncation_min_results: defaults::DEFAULT_TRUNCATION_MIN_RESULTS,
            truncation_gap_multiplier: defaults::DEFAULT_TRUNCATION_GAP_MULTIPLIER,
        }
    }
}
