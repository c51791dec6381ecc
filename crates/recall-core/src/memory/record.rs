use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;
use super::tier::ImportanceTier;
use super::types::MemoryType;
use crate::constants::{DEFAULT_DIFFICULTY, DEFAULT_IMPORTANCE_WEIGHT};

/// Embedding lifecycle of a record, driven by the retry manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingStatus {
    #[default]
    Pending,
    Retry,
    Failed,
    Success,
}

impl EmbeddingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Retry => "retry",
            Self::Failed => "failed",
            Self::Success => "success",
        }
    }

    /// Lenient parse used at the storage boundary: unknown values become `Pending`.
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "retry" => Self::Retry,
            "failed" => Self::Failed,
            "success" => Self::Success,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for EmbeddingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted unit of knowledge. Every record in the store is a MemoryRecord;
/// all internal logic operates on this normalized shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Store-assigned identifier. Zero until persisted.
    pub id: i64,
    /// Collection (document folder) the record belongs to. Siblings share a collection.
    pub collection: String,
    pub title: String,
    pub content: String,
    pub trigger_phrases: Vec<String>,
    /// Cognitive type; selects the baseline half-life.
    pub memory_type: Option<MemoryType>,
    pub tier: ImportanceTier,
    /// Importance weight in [0, 1].
    pub importance_weight: f64,
    /// Explicit half-life override in days.
    pub half_life_days: Option<f64>,
    /// Earned FSRS stability in days.
    pub stability: Option<f64>,
    /// FSRS difficulty in [1, 10].
    pub difficulty: f64,
    /// Decay clock.
    pub last_review: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub confidence: Confidence,
    pub validation_count: u32,
    pub access_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub is_pinned: bool,
    pub is_archived: bool,
    /// Parent record for chunks of an oversized document.
    pub parent_id: Option<i64>,
    pub chunk_index: Option<u32>,
    pub chunk_label: Option<String>,
    pub embedding_status: EmbeddingStatus,
    pub retry_count: u32,
    pub last_retry_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    /// blake3 hash of `content`.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// A fresh, unpersisted record with default decay and validation state.
    pub fn new(
        collection: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        Self {
            id: 0,
            collection: collection.into(),
            title: title.into(),
            content_hash: Self::compute_content_hash(&content),
            content,
            trigger_phrases: Vec::new(),
            memory_type: None,
            tier: ImportanceTier::Normal,
            importance_weight: DEFAULT_IMPORTANCE_WEIGHT,
            half_life_days: None,
            stability: None,
            difficulty: DEFAULT_DIFFICULTY,
            last_review: None,
            review_count: 0,
            confidence: Confidence::default(),
            validation_count: 0,
            access_count: 0,
            last_accessed: None,
            is_pinned: false,
            is_archived: false,
            parent_id: None,
            chunk_index: None,
            chunk_label: None,
            embedding_status: EmbeddingStatus::Pending,
            retry_count: 0,
            last_retry_at: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// blake3 hash of the content, hex encoded.
    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Timestamp the decay clock runs from: last review, else last update, else creation.
    pub fn decay_anchor(&self) -> DateTime<Utc> {
        self.last_review.unwrap_or(self.updated_at)
    }

    /// Pinned, constitutional, and critical records never decay.
    pub fn is_decay_exempt(&self) -> bool {
        self.is_pinned || self.tier.is_protected()
    }

    /// True for chunk children of an oversized document.
    pub fn is_chunk(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Text used for sibling interference detection.
    pub fn interference_text(&self) -> String {
        let mut text = self.title.clone();
        for phrase in &self.trigger_phrases {
            text.push(' ');
            text.push_str(phrase);
        }
        text
    }
}

/// Identity equality: two records are equal if they have the same ID.
impl PartialEq for MemoryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
