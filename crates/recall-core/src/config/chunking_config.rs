use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunking and thinning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Documents longer than this many chars are chunked.
    pub trigger_chars: usize,
    pub target_chars: usize,
    /// Sections above this size are emitted standalone or re-split.
    pub max_chars: usize,
    pub parent_summary_chars: usize,
    pub thinning_threshold: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            trigger_chars: defaults::DEFAULT_CHUNKING_TRIGGER_CHARS,
            target_chars: defaults::DEFAULT_CHUNK_TARGET_CHARS,
            max_chars: defaults::DEFAULT_CHUNK_MAX_CHARS,
            parent_summary_chars: defaults::DEFAULT_PARENT_SUMMARY_CHARS,
            thinning_threshold: defaults::DEFAULT_THINNING_THRESHOLD,
        }
    }
}
