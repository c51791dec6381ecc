//! # recall-decay
//!
//! FSRS power-law retrievability, the five-state tier classifier
//! (HOT/WARM/COLD/DORMANT/ARCHIVED), and review scheduling.

pub mod classifier;
pub mod formula;
pub mod half_life;
pub mod review;

pub use classifier::{
    Classification, ClassifiedRecord, StateStats, StateThresholds, TierClassifier,
};
pub use review::{apply_review, FsrsParams, Grade, ReviewResult};
