//! Confidence-based truncation: cut the ranked list at the first score gap
//! that is anomalously large relative to the median gap.

use serde::{Deserialize, Serialize};

use recall_core::config::RetrievalConfig;
use recall_observability::events;

use super::Scored;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncationParams {
    /// Never cut below this many results.
    pub min_results: usize,
    pub gap_multiplier: f64,
}

impl Default for TruncationParams {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

impl TruncationParams {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            min_results: config.truncation_min_results,
            gap_multiplier: config.truncation_gap_multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncationResult<T> {
    pub results: Vec<T>,
    pub truncated: bool,
    pub original_count: usize,
    pub truncated_count: usize,
    pub median_gap: f64,
    /// The gap that triggered the cut, 0 when nothing was cut.
    pub cutoff_gap: f64,
    /// Index of the last kept result.
    pub cutoff_index: usize,
}

impl<T> TruncationResult<T> {
    fn untouched(results: Vec<T>, original_count: usize, median_gap: f64) -> Self {
        let n = results.len();
        Self {
            results,
            truncated: false,
            original_count,
            truncated_count: n,
            median_gap,
            cutoff_gap: 0.0,
            cutoff_index: n.saturating_sub(1),
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Truncate `items` at the first gap (from index `min_results − 1` on) that
/// exceeds `median_gap · gap_multiplier`. Pass-through when disabled.
pub fn truncate_by_confidence<T: Scored>(
    items: Vec<T>,
    params: &TruncationParams,
    enabled: bool,
) -> TruncationResult<T> {
    let original_count = items.len();
    if !enabled {
        return TruncationResult::untouched(items, original_count, 0.0);
    }

    let mut items: Vec<T> = items.into_iter().filter(|i| i.score().is_finite()).collect();
    items.sort_by(|a, b| b.score().total_cmp(&a.score()));

    if items.len() <= params.min_results.max(1) {
        return TruncationResult::untouched(items, original_count, 0.0);
    }

    let gaps: Vec<f64> = items.windows(2).map(|w| w[0].score() - w[1].score()).collect();
    if gaps.iter().all(|g| *g == 0.0) {
        return TruncationResult::untouched(items, original_count, 0.0);
    }

    let median_gap = median(&gaps);
    let threshold = median_gap * params.gap_multiplier;
    let start = params.min_results.saturating_sub(1);
    let cut = gaps
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, gap)| **gap > threshold)
        .map(|(i, gap)| (i, *gap));

    match cut {
        Some((index, gap)) => {
            let before = items.len();
            items.truncate(index + 1);
            events::truncation_applied(before, items.len(), median_gap, gap);
            TruncationResult {
                truncated_count: items.len(),
                results: items,
                truncated: true,
                original_count,
                median_gap,
                cutoff_gap: gap,
                cutoff_index: index,
            }
        }
        None => TruncationResult::untouched(items, original_count, median_gap),
    }
}
