//! Rank fusion over independent search channels.

pub mod channel;
pub mod rrf;
pub mod rsf;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A search channel that produced a ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Vector,
    Fts,
    Bm25,
    Graph,
    Keyword,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Fts => "fts",
            Self::Bm25 => "bm25",
            Self::Graph => "graph",
            Self::Keyword => "keyword",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a channel's output. `score` is the channel's raw score, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub id: i64,
    pub score: Option<f64>,
}

/// A channel's results, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    pub channel: Channel,
    pub items: Vec<RankedItem>,
    /// Overrides the channel's default fusion weight.
    pub weight: Option<f64>,
}

impl RankedList {
    /// A list of ids without raw scores.
    pub fn from_ids(channel: Channel, ids: &[i64]) -> Self {
        Self {
            channel,
            items: ids.iter().map(|&id| RankedItem { id, score: None }).collect(),
            weight: None,
        }
    }

    /// A list of `(id, raw score)` pairs, kept in the given order.
    pub fn from_scored(channel: Channel, scored: &[(i64, f64)]) -> Self {
        Self {
            channel,
            items: scored
                .iter()
                .map(|&(id, score)| RankedItem {
                    id,
                    score: Some(score),
                })
                .collect(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Raw score of the item at `rank`, falling back to `1 - rank/n`
    /// (1.0 for lists of one).
    pub fn effective_score(&self, rank: usize) -> f64 {
        match self.items.get(rank).and_then(|item| item.score) {
            Some(score) if score.is_finite() => score,
            _ => rank_score(rank, self.items.len()),
        }
    }
}

pub(crate) fn rank_score(rank: usize, n: usize) -> f64 {
    if n <= 1 {
        1.0
    } else {
        1.0 - rank as f64 / n as f64
    }
}

/// A fused candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    pub id: i64,
    pub score: f64,
    /// Channels that returned the id, in first-seen order.
    pub sources: Vec<Channel>,
    pub source_scores: BTreeMap<Channel, f64>,
    pub convergence_bonus: f64,
    /// Set when channel representation pulled this item in.
    pub promoted_from: Option<Channel>,
}

impl FusionResult {
    pub(crate) fn new(id: i64) -> Self {
        Self {
            id,
            score: 0.0,
            sources: Vec::new(),
            source_scores: BTreeMap::new(),
            convergence_bonus: 0.0,
            promoted_from: None,
        }
    }

    pub(crate) fn add_source(&mut self, channel: Channel, contribution: f64) {
        if !self.sources.contains(&channel) {
            self.sources.push(channel);
        }
        *self.source_scores.entry(channel).or_default() += contribution;
    }
}

/// Score descending, id ascending on ties.
pub(crate) fn sort_fused(results: &mut [FusionResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
}
