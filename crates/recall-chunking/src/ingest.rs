//! Persisting a document: small documents as one record, large ones as a
//! summary parent plus thinned chunk children.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::errors::RecallResult;
use recall_core::memory::MemoryRecord;
use recall_core::traits::IMemoryStore;
use recall_observability::chunking_span;

use crate::chunker::{ChunkStrategy, Chunker};
use crate::thinning::thin_chunks;

/// What [`ingest_document`] wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// The single record, or the parent of the chunks.
    pub record_id: i64,
    /// `None` when the document was stored whole.
    pub strategy: Option<ChunkStrategy>,
    pub chunk_ids: Vec<i64>,
    pub dropped_chunks: usize,
}

/// Store `content` under `collection`. The `template` supplies type, tier,
/// and trigger phrases for every record written.
pub fn ingest_document(
    store: &dyn IMemoryStore,
    chunker: &Chunker,
    template: &MemoryRecord,
    content: &str,
    now: DateTime<Utc>,
) -> RecallResult<IngestOutcome> {
    let chars = content.chars().count();
    let _span = chunking_span!(chars).entered();

    if !chunker.needs_chunking(content) {
        let id = store.create(&from_template(template, &template.title, content, now))?;
        return Ok(IngestOutcome {
            record_id: id,
            strategy: None,
            chunk_ids: Vec::new(),
            dropped_chunks: 0,
        });
    }

    let chunked = chunker.chunk_large_file(content);
    let thinned = thin_chunks(&chunked.chunks, Some(chunker.config().thinning_threshold));

    let parent_id = store.create(&from_template(
        template,
        &template.title,
        &chunked.parent_summary,
        now,
    ))?;

    let children: Vec<MemoryRecord> = thinned
        .retained
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let title = format!("{} [{}]", template.title, chunk.label);
            let mut child = from_template(template, &title, &chunk.content, now);
            child.parent_id = Some(parent_id);
            child.chunk_index = Some(i as u32);
            child.chunk_label = Some(chunk.label.clone());
            child
        })
        .collect();

    let chunk_ids = match store.create_bulk(&children) {
        Ok(ids) => ids,
        Err(e) => {
            // Leave no orphan parent behind.
            if let Err(cleanup) = store.delete_bulk(&[parent_id]) {
                tracing::warn!(parent_id, error = %cleanup, "failed to remove parent after chunk insert failure");
            }
            return Err(e);
        }
    };

    tracing::info!(
        parent_id,
        strategy = chunked.strategy.as_str(),
        chunks = chunk_ids.len(),
        dropped = thinned.dropped.len(),
        "document chunked"
    );

    Ok(IngestOutcome {
        record_id: parent_id,
        strategy: Some(chunked.strategy),
        chunk_ids,
        dropped_chunks: thinned.dropped.len(),
    })
}

fn from_template(template: &MemoryRecord, title: &str, content: &str, now: DateTime<Utc>) -> MemoryRecord {
    let mut record = MemoryRecord::new(template.collection.clone(), title, content, now);
    record.memory_type = template.memory_type;
    record.tier = template.tier;
    record.importance_weight = template.importance_weight;
    record.half_life_days = template.half_life_days;
    record.trigger_phrases = template.trigger_phrases.clone();
    record.is_pinned = template.is_pinned;
    record
}
