//! # recall-chunking
//!
//! Splits oversized documents into indexable chunks (anchor-aware, with a
//! markdown-structure fallback), scores each chunk, and thins out the
//! low-value ones before they are persisted.

pub mod anchor;
pub mod chunker;
pub mod ingest;
pub mod thinning;

pub use chunker::{Chunk, ChunkStrategy, Chunker, ChunkingResult};
pub use ingest::{ingest_document, IngestOutcome};
pub use thinning::{score_chunk, thin_chunks, ChunkScore, ThinningResult};
