//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a recorded validation.
pub fn validation_recorded(memory_id: i64, useful: bool, previous: f64, confidence: f64, count: u32) {
    tracing::info!(
        event = "validation_recorded",
        memory_id = memory_id,
        useful = useful,
        previous = previous,
        confidence = confidence,
        validation_count = count,
        "validation recorded"
    );
}

/// Log a tier promotion.
pub fn memory_promoted(memory_id: i64, from: &str, to: &str) {
    tracing::info!(
        event = "memory_promoted",
        memory_id = memory_id,
        from = %from,
        to = %to,
        "memory promoted"
    );
}

/// Log a memory archival event.
pub fn memory_archived(memory_id: i64, reason: &str) {
    tracing::info!(
        event = "memory_archived",
        memory_id = memory_id,
        reason = %reason,
        "memory archived"
    );
}

/// Log a memory restored from the archive.
pub fn memory_unarchived(memory_id: i64) {
    tracing::info!(
        event = "memory_unarchived",
        memory_id = memory_id,
        "memory unarchived"
    );
}

/// Log an operation that failed and fell back to a safe default.
pub fn degradation_triggered(operation: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        operation = %operation,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log an embedding that exhausted its retries.
pub fn retry_exhausted(memory_id: i64, attempts: u32, reason: &str) {
    tracing::warn!(
        event = "retry_exhausted",
        memory_id = memory_id,
        attempts = attempts,
        reason = %reason,
        "embedding retries exhausted"
    );
}

/// Log a result set that overflowed its token budget.
pub fn budget_overflow(query_id: &str, candidates: usize, total_tokens: usize, budget: usize, kept: usize) {
    tracing::warn!(
        event = "budget_overflow",
        query_id = %query_id,
        candidates = candidates,
        total_tokens = total_tokens,
        budget = budget,
        kept = kept,
        "token budget overflow"
    );
}

/// Log a confidence-gap truncation.
pub fn truncation_applied(original: usize, kept: usize, median_gap: f64, cutoff_gap: f64) {
    tracing::debug!(
        event = "truncation_applied",
        original = original,
        kept = kept,
        median_gap = median_gap,
        cutoff_gap = cutoff_gap,
        "confidence truncation applied"
    );
}
