use proptest::prelude::*;

use recall_chunking::{thin_chunks, Chunk, Chunker};
use recall_core::config::ChunkingConfig;

fn arb_chunk() -> impl Strategy<Value = Chunk> {
    ("[ a-z#\\-\n`]{0,300}", prop::collection::vec("[a-z]{1,6}", 0..3)).prop_map(|(content, anchor_ids)| {
        let char_count = content.chars().count();
        Chunk {
            content,
            anchor_ids,
            label: "p".to_string(),
            char_count,
        }
    })
}

proptest! {
    #[test]
    fn thinning_partitions_and_never_empties(
        chunks in prop::collection::vec(arb_chunk(), 0..12),
        threshold in 0.0f64..1.0,
    ) {
        let result = thin_chunks(&chunks, Some(threshold));
        prop_assert_eq!(result.retained.len() + result.dropped.len(), chunks.len());
        prop_assert_eq!(result.scores.len(), chunks.len());
        if !chunks.is_empty() {
            prop_assert!(!result.retained.is_empty());
        }
        for s in &result.scores {
            prop_assert!((0.0..=1.0).contains(&s.score));
            prop_assert!((0.0..=1.0).contains(&s.density_score));
        }
    }

    #[test]
    fn raising_the_threshold_never_retains_more(
        chunks in prop::collection::vec(arb_chunk(), 0..12),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let loose = thin_chunks(&chunks, Some(low));
        let strict = thin_chunks(&chunks, Some(high));
        prop_assert!(strict.retained.len() <= loose.retained.len());
        for (s, l) in strict.scores.iter().zip(&loose.scores) {
            if s.retained {
                prop_assert!(l.retained);
            }
        }
    }

    #[test]
    fn structure_chunks_respect_cap_and_keep_text(
        paragraphs in prop::collection::vec("[a-z ]{1,40}", 1..30),
    ) {
        let chunker = Chunker::new(&ChunkingConfig {
            target_chars: 60,
            max_chars: 120,
            ..ChunkingConfig::default()
        });
        let doc = paragraphs.join("\n\n");
        let chunks = chunker.chunk_by_structure(&doc);
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect::<String>();
        let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(squash(&rebuilt), squash(&doc));
        for c in &chunks {
            prop_assert!(c.anchor_ids.is_empty());
            prop_assert!(c.label.starts_with("chunk-"));
        }
    }
}
