//! # recall-core
//!
//! Foundation crate for the recall ranking core.
//! Defines the memory record model, importance tiers, decay states, errors,
//! configuration, and the collaborator traits every other crate builds on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RecallConfig;
pub use errors::{RecallError, RecallResult};
pub use memory::{Confidence, DecayState, EmbeddingStatus, ImportanceTier, MemoryRecord, MemoryType};
