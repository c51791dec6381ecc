use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use recall_core::config::ValidationConfig;
use recall_core::memory::{Confidence, ImportanceTier, MemoryRecord};
use recall_core::traits::IMemoryStore;
use recall_storage::StorageEngine;
use recall_validation::{ConfidenceTracker, PromotionPolicy};

fn arb_tier() -> impl Strategy<Value = ImportanceTier> {
    prop::sample::select(ImportanceTier::ALL.to_vec())
}

proptest! {
    #[test]
    fn confidence_stays_in_unit_interval(
        start in 0.0f64..=1.0,
        signals in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        let end = signals
            .iter()
            .fold(Confidence::new(start), |c, &useful| c.after_validation(useful));
        prop_assert!((0.0..=1.0).contains(&end.value()));
    }

    #[test]
    fn protected_tiers_never_eligible(
        confidence in 0.0f64..=1.0,
        count in 0u32..1000,
        tier in arb_tier(),
    ) {
        let eligible = PromotionPolicy::default().is_eligible(Confidence::new(confidence), count, tier);
        if tier.is_protected() {
            prop_assert!(!eligible);
        }
    }

    #[test]
    fn eligibility_is_monotone_in_count(
        confidence in 0.0f64..=1.0,
        count in 0u32..100,
    ) {
        let policy = PromotionPolicy::default();
        let c = Confidence::new(confidence);
        if policy.is_eligible(c, count, ImportanceTier::Normal) {
            prop_assert!(policy.is_eligible(c, count + 1, ImportanceTier::Normal));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn each_validation_increments_count_by_one(
        signals in prop::collection::vec(any::<bool>(), 1..20),
    ) {
        let store = StorageEngine::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let id = store.create(&MemoryRecord::new("p", "t", "c", now)).unwrap();
        let tracker = ConfidenceTracker::new(&store, &ValidationConfig::default());

        let mut expected = Confidence::default();
        for (i, &useful) in signals.iter().enumerate() {
            let outcome = tracker.try_record_validation(id, useful).unwrap();
            expected = expected.after_validation(useful);
            prop_assert_eq!(outcome.validation_count, i as u32 + 1);
            prop_assert!((outcome.confidence - expected.value()).abs() < 1e-9);
        }
    }
}
