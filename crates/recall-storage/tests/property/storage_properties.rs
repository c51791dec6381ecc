//! Property tests: create→get preserves text fields, confidence stays clamped
//! under any validation sequence.

use chrono::Utc;
use proptest::prelude::*;

use recall_core::memory::*;
use recall_core::traits::IMemoryStore;
use recall_storage::StorageEngine;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_create_get_preserves_text(
        title in "[a-zA-Z0-9 ]{0,80}",
        content in "\\PC{0,400}",
        triggers in proptest::collection::vec("[a-z]{1,12}", 0..6),
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut record = MemoryRecord::new("prop", title.clone(), content.clone(), Utc::now());
        record.trigger_phrases = triggers.clone();

        let id = engine.create(&record).unwrap();
        let stored = engine.get(id).unwrap().unwrap();
        prop_assert_eq!(stored.title, title);
        prop_assert_eq!(stored.content, content);
        prop_assert_eq!(stored.trigger_phrases, triggers);
        prop_assert_eq!(stored.content_hash, record.content_hash);
    }

    #[test]
    fn prop_confidence_stays_in_unit_interval(
        outcomes in proptest::collection::vec(any::<bool>(), 1..40),
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let id = engine
            .create(&MemoryRecord::new("prop", "t", "c", Utc::now()))
            .unwrap();

        for useful in &outcomes {
            let useful = *useful;
            engine
                .update_confidence(id, &move |c| c.after_validation(useful))
                .unwrap();
        }

        let stored = engine.get(id).unwrap().unwrap();
        prop_assert!((0.0..=1.0).contains(&stored.confidence.value()));
        prop_assert_eq!(stored.validation_count as usize, outcomes.len());
    }
}
