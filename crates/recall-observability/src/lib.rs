//! # recall-observability
//!
//! Structured logging for the recall workspace: subscriber setup, span macros,
//! and one event helper per significant operation.

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
