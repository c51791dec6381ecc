use super::{ProviderError, StorageError};

/// Top-level error for the recall workspace.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    /// The referenced record is absent.
    #[error("memory not found: {id}")]
    NotFound { id: i64 },

    /// Connection or transaction failure in the store.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// Malformed record, score, or parameter.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Embedding/provider timeout, failure, or null result.
    #[error("transient provider failure: {0}")]
    TransientProviderFailure(#[from] ProviderError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl RecallError {
    /// Shorthand for [`RecallError::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether a retry could succeed without changing the input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(StorageError::Busy { .. }) | Self::TransientProviderFailure(_)
        )
    }
}

pub type RecallResult<T> = Result<T, RecallError>;
