//! # recall-maintenance
//!
//! Background upkeep for the memory store: the embedding retry queue with
//! backoff, and the periodic archival sweep. Both run as cancellable tokio
//! tasks owned by [`MaintenanceEngine`]; the batch logic is synchronous and
//! callable directly.

pub mod archival;
pub mod engine;
pub mod retry;
pub mod scheduler;

pub use archival::{ArchivalStats, ArchivalSweep, SweepReport};
pub use engine::{MaintenanceEngine, MaintenanceStatus};
pub use retry::{backoff_delay, is_retry_eligible, AttemptOutcome, RetryBatchReport, RetryManager};
pub use scheduler::ScheduledTask;
