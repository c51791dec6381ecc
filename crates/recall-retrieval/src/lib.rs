//! # recall-retrieval
//!
//! Query-time ranking: multi-channel rank fusion (RRF, RSF, channel
//! representation), the composite scorer with its novelty and interference
//! adjustments, score normalization, and confidence/token-budget truncation.

pub mod engine;
pub mod fusion;
pub mod ranking;

pub use engine::{RetrievalPipeline, RetrievalRequest, RetrievalResponse};
pub use fusion::{Channel, FusionResult, RankedItem, RankedList};
pub use ranking::scorer::{CompositeScorer, ScoreBreakdown, ScoringInput};
pub use ranking::ScoredResult;
