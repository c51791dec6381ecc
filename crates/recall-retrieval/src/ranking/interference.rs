//! Sibling interference: how many records in the same collection say
//! nearly the same thing as this one.

use std::collections::{BTreeMap, HashMap, HashSet};

use recall_core::errors::RecallResult;
use recall_core::memory::MemoryRecord;
use recall_core::traits::IMemoryStore;

/// Lowercase tokens longer than two chars, split on whitespace, `,`, `;`, `|`.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '|'))
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() > 2)
        .collect()
}

/// Token Jaccard similarity in [0, 1]. Either side empty gives 0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokenize(a), tokenize(b));
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let shared = ta.intersection(&tb).count();
    let union = ta.len() + tb.len() - shared;
    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}

/// Interfering siblings of `target` among `pool`. Chunks, the record
/// itself, and other collections never count.
pub fn count_interference(target: &MemoryRecord, pool: &[MemoryRecord], threshold: f64) -> u32 {
    if target.is_chunk() {
        return 0;
    }
    let text = target.interference_text();
    if text.trim().is_empty() {
        return 0;
    }
    pool.iter()
        .filter(|s| s.id != target.id && !s.is_chunk() && s.collection == target.collection)
        .filter(|s| text_similarity(&text, &s.interference_text()) >= threshold)
        .count() as u32
}

/// Counts for every record in `records`, measured against `pool`.
pub fn interference_counts(records: &[MemoryRecord], pool: &[MemoryRecord], threshold: f64) -> HashMap<i64, u32> {
    records
        .iter()
        .map(|r| (r.id, count_interference(r, pool, threshold)))
        .collect()
}

/// Counts for `records`, measured against each record's whole collection as
/// stored. Loads each collection once.
pub fn interference_counts_from_store(
    store: &dyn IMemoryStore,
    records: &[MemoryRecord],
    threshold: f64,
) -> RecallResult<HashMap<i64, u32>> {
    let mut by_collection: BTreeMap<&str, Vec<&MemoryRecord>> = BTreeMap::new();
    for record in records {
        by_collection.entry(record.collection.as_str()).or_default().push(record);
    }

    let mut counts = HashMap::with_capacity(records.len());
    for (collection, members) in by_collection {
        let pool = if collection.is_empty() {
            Vec::new()
        } else {
            store.list_collection(collection)?
        };
        for record in members {
            counts.insert(record.id, count_interference(record, &pool, threshold));
        }
    }
    Ok(counts)
}

/// `max(0, score − penalty · count)` when enabled.
pub fn apply_interference_penalty(score: f64, count: u32, penalty: f64, enabled: bool) -> f64 {
    if !enabled || count == 0 {
        return score;
    }
    (score - penalty * f64::from(count)).max(0.0)
}
