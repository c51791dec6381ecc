//! # recall-validation
//!
//! Validation feedback for stored memories. Each "useful" / "not useful"
//! signal moves a record's confidence; records that earn enough trust over
//! enough validations can be promoted to the critical tier.
//!
//! Read paths degrade to safe defaults (confidence 0.5, count 0, not
//! eligible); the `try_*` variants surface the underlying error instead.

pub mod promotion;
pub mod tracker;

pub use promotion::{PromotionPolicy, PromotionProgress};
pub use tracker::{ConfidenceInfo, ConfidenceTracker, ValidationOutcome};
