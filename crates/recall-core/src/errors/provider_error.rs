/// Embedding and content provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("provider {provider} returned no embedding")]
    NullEmbedding { provider: String },

    #[error("provider {provider} failed: {reason}")]
    Failed { provider: String, reason: String },

    #[error("content unavailable for memory {id}: {reason}")]
    ContentUnavailable { id: i64, reason: String },
}
