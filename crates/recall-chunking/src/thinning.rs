//! Chunk quality scoring and thinning.
//!
//! Each chunk gets `0.6 * anchor + 0.4 * density`. Chunks below the
//! threshold are dropped, but a non-empty input never thins to nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use recall_core::config::defaults::DEFAULT_THINNING_THRESHOLD;

use crate::chunker::Chunk;

pub const ANCHOR_WEIGHT: f64 = 0.6;
pub const DENSITY_WEIGHT: f64 = 0.4;

/// Stripped length below which density is scaled down linearly.
const SHORT_CONTENT_CHARS: f64 = 100.0;

const HEADING_BONUS: f64 = 0.1;
const CODE_FENCE_BONUS: f64 = 0.05;
const LIST_BONUS: f64 = 0.05;
const MAX_STRUCTURE_BONUS: f64 = 0.2;

static HTML_COMMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());
static HEADING: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s").ok());
static CODE_FENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"```").ok());
static LIST_ITEM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:[-*+]|\d+\.)\s").ok());

/// Score breakdown for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkScore {
    /// Position in the input slice.
    pub index: usize,
    pub anchor_score: f64,
    pub density_score: f64,
    pub structure_bonus: f64,
    pub score: f64,
    pub retained: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinningResult {
    /// Retained chunks in input order.
    pub retained: Vec<Chunk>,
    pub dropped: Vec<Chunk>,
    pub scores: Vec<ChunkScore>,
}

fn matches(re: &LazyLock<Option<Regex>>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

fn structure_bonus(content: &str) -> f64 {
    let mut bonus = 0.0;
    if matches(&HEADING, content) {
        bonus += HEADING_BONUS;
    }
    if matches(&CODE_FENCE, content) {
        bonus += CODE_FENCE_BONUS;
    }
    if matches(&LIST_ITEM, content) {
        bonus += LIST_BONUS;
    }
    f64::min(bonus, MAX_STRUCTURE_BONUS)
}

/// Density in [0, 1] plus the structure bonus that went into it.
fn density(content: &str) -> (f64, f64) {
    let raw = content.chars().count();
    if raw == 0 || content.trim().is_empty() {
        return (0.0, 0.0);
    }

    let without_comments = match HTML_COMMENT.as_ref() {
        Some(re) => re.replace_all(content, ""),
        None => content.into(),
    };
    let stripped = without_comments.chars().filter(|c| !c.is_whitespace()).count() as f64;

    let mut ratio = stripped / raw as f64;
    if stripped < SHORT_CONTENT_CHARS {
        ratio *= stripped / SHORT_CONTENT_CHARS;
    }
    let bonus = structure_bonus(content);
    ((ratio + bonus).clamp(0.0, 1.0), bonus)
}

/// Score a single chunk. `retained` is left false; [`thin_chunks`] decides it.
pub fn score_chunk(index: usize, chunk: &Chunk) -> ChunkScore {
    let anchor_score = if chunk.anchor_ids.is_empty() { 0.0 } else { 1.0 };
    let (density_score, structure_bonus) = density(&chunk.content);
    let score = (ANCHOR_WEIGHT * anchor_score + DENSITY_WEIGHT * density_score).clamp(0.0, 1.0);
    ChunkScore {
        index,
        anchor_score,
        density_score,
        structure_bonus,
        score,
        retained: false,
    }
}

/// Drop chunks scoring below `threshold` (default 0.3 when `None`).
pub fn thin_chunks(chunks: &[Chunk], threshold: Option<f64>) -> ThinningResult {
    let threshold = threshold.unwrap_or(DEFAULT_THINNING_THRESHOLD);
    let mut scores: Vec<ChunkScore> = chunks
        .iter()
        .enumerate()
        .map(|(i, c)| score_chunk(i, c))
        .collect();

    if chunks.len() <= 1 {
        for s in &mut scores {
            s.retained = true;
        }
        return ThinningResult {
            retained: chunks.to_vec(),
            dropped: Vec::new(),
            scores,
        };
    }

    for s in &mut scores {
        s.retained = s.score >= threshold;
    }
    if !scores.iter().any(|s| s.retained) {
        // First index wins ties.
        let best = scores
            .iter()
            .enumerate()
            .fold(0, |best, (i, s)| if s.score > scores[best].score { i } else { best });
        scores[best].retained = true;
    }

    let (mut retained, mut dropped) = (Vec::new(), Vec::new());
    for (chunk, s) in chunks.iter().zip(&scores) {
        if s.retained {
            retained.push(chunk.clone());
        } else {
            dropped.push(chunk.clone());
        }
    }

    tracing::debug!(
        total = chunks.len(),
        retained = retained.len(),
        dropped = dropped.len(),
        threshold,
        "chunks thinned"
    );

    ThinningResult {
        retained,
        dropped,
        scores,
    }
}
