//! Reciprocal Rank Fusion: score = Σ weight / (k + rank + 1), plus a
//! convergence bonus for ids that more than one list agrees on.

use std::collections::{HashMap, HashSet};

use recall_core::config::{defaults, RetrievalConfig};

use super::{sort_fused, Channel, FusionResult, RankedList};
use crate::ranking::normalize::normalize_scores;

/// Fusion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrfParams {
    /// Smoothing constant. Higher k flattens the influence of top ranks.
    pub k: u32,
    pub convergence_bonus: f64,
    /// Default weight of the graph channel.
    pub graph_weight_boost: f64,
}

impl Default for RrfParams {
    fn default() -> Self {
        Self {
            k: defaults::DEFAULT_RRF_K,
            convergence_bonus: defaults::DEFAULT_CONVERGENCE_BONUS,
            graph_weight_boost: defaults::DEFAULT_GRAPH_WEIGHT_BOOST,
        }
    }
}

impl RrfParams {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            k: config.rrf_k,
            convergence_bonus: config.convergence_bonus,
            graph_weight_boost: config.graph_weight_boost,
        }
    }

    fn weight_of(&self, list: &RankedList) -> f64 {
        match list.weight {
            Some(w) if w.is_finite() && w > 0.0 => w,
            _ if list.channel == Channel::Graph => self.graph_weight_boost,
            _ => 1.0,
        }
    }
}

/// Fuse any number of ranked lists.
///
/// An id repeated inside one list counts once, at its first position. The
/// convergence bonus counts lists, so two lists from the same channel still
/// agree with each other.
pub fn fuse(lists: &[RankedList], params: &RrfParams) -> Vec<FusionResult> {
    let k = f64::from(params.k);
    let mut by_id: HashMap<i64, FusionResult> = HashMap::new();
    let mut hits: HashMap<i64, usize> = HashMap::new();

    for list in lists {
        let weight = params.weight_of(list);
        let mut seen = HashSet::new();
        for (rank, item) in list.items.iter().enumerate() {
            if !seen.insert(item.id) {
                continue;
            }
            let contribution = weight / (k + rank as f64 + 1.0);
            let entry = by_id.entry(item.id).or_insert_with(|| FusionResult::new(item.id));
            entry.score += contribution;
            entry.add_source(list.channel, contribution);
            *hits.entry(item.id).or_default() += 1;
        }
    }

    let mut results: Vec<FusionResult> = by_id.into_values().collect();
    for result in &mut results {
        let lists_hit = hits.get(&result.id).copied().unwrap_or(0);
        if lists_hit >= 2 {
            let bonus = params.convergence_bonus * (lists_hit - 1) as f64;
            result.convergence_bonus = bonus;
            result.score += bonus;
        }
    }
    sort_fused(&mut results);
    results
}

/// Two-list convenience: a vector list and a full-text list.
pub fn fuse_pair(vector: &[i64], fts: &[i64], k: u32) -> Vec<FusionResult> {
    let params = RrfParams {
        k,
        ..RrfParams::default()
    };
    fuse(
        &[
            RankedList::from_ids(Channel::Vector, vector),
            RankedList::from_ids(Channel::Fts, fts),
        ],
        &params,
    )
}

/// Fuse the channel lists of several query variants.
///
/// Each variant is fused on its own, then the per-variant scores are summed
/// and ids found by more than one variant earn the convergence bonus again.
pub fn fuse_cross_variant(variants: &[Vec<RankedList>], params: &RrfParams) -> Vec<FusionResult> {
    let mut by_id: HashMap<i64, (FusionResult, usize)> = HashMap::new();

    for variant in variants {
        for fused in fuse(variant, params) {
            match by_id.get_mut(&fused.id) {
                Some((combined, count)) => {
                    combined.score += fused.score;
                    combined.convergence_bonus += fused.convergence_bonus;
                    for (channel, score) in &fused.source_scores {
                        combined.add_source(*channel, *score);
                    }
                    *count += 1;
                }
                None => {
                    by_id.insert(fused.id, (fused, 1));
                }
            }
        }
    }

    let mut results: Vec<FusionResult> = by_id
        .into_values()
        .map(|(mut result, count)| {
            if count >= 2 {
                let bonus = params.convergence_bonus * (count - 1) as f64;
                result.convergence_bonus += bonus;
                result.score += bonus;
            }
            result
        })
        .collect();
    sort_fused(&mut results);
    results
}

/// Lowercased query terms of at least two chars.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

/// Add `bonus` per query term found in each result's searchable text, then re-sort.
/// Results with no text get no bonus.
pub fn apply_term_match_bonus<F>(results: &mut [FusionResult], query: &str, bonus: f64, text_of: F)
where
    F: Fn(i64) -> Option<String>,
{
    let terms = query_terms(query);
    if terms.is_empty() {
        return;
    }
    for result in results.iter_mut() {
        let Some(text) = text_of(result.id) else {
            continue;
        };
        let text = text.to_lowercase();
        let matches = terms.iter().filter(|t| text.contains(t.as_str())).count();
        result.score += matches as f64 * bonus;
    }
    sort_fused(results);
}

/// Min-max rescale fused scores in place when `enabled`.
pub fn normalize_fusion_scores(results: &mut [FusionResult], enabled: bool) {
    if !enabled {
        return;
    }
    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    for (result, score) in results.iter_mut().zip(normalize_scores(&scores)) {
        result.score = score;
    }
}
