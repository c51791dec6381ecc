use crate::errors::RecallResult;
use crate::memory::MemoryRecord;

/// Embedding generation provider.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text. `Ok(None)` means the provider produced nothing.
    fn embed(&self, text: &str) -> RecallResult<Option<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool;
}

/// Loads the text to embed for a record whose stored content is empty.
pub trait IContentLoader: Send + Sync {
    fn load(&self, record: &MemoryRecord) -> RecallResult<Option<String>>;
}
