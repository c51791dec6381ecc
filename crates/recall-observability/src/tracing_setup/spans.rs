//! Span definitions per operation: retrieval, fusion, chunking, validation, maintenance.

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query_id:expr, $channels:expr) => {
        tracing::info_span!("recall.retrieval", query_id = %$query_id, channels = $channels)
    };
}

/// Create a chunking span.
#[macro_export]
macro_rules! chunking_span {
    ($chars:expr) => {
        tracing::info_span!("recall.chunking", chars = $chars)
    };
}

/// Create a validation span.
#[macro_export]
macro_rules! validation_span {
    ($memory_id:expr) => {
        tracing::info_span!("recall.validation", memory_id = $memory_id)
    };
}

/// Create a maintenance span.
#[macro_export]
macro_rules! maintenance_span {
    ($job:expr) => {
        tracing::info_span!("recall.maintenance", job = %$job)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETRIEVAL: &str = "recall.retrieval";
    pub const CHUNKING: &str = "recall.chunking";
    pub const VALIDATION: &str = "recall.validation";
    pub const MAINTENANCE: &str = "recall.maintenance";
}
