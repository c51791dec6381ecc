pub mod embedding;
pub mod storage;

pub use embedding::{IContentLoader, IEmbeddingProvider};
pub use storage::{ConfidenceUpdate, EmbeddingStats, IMemoryStore};
