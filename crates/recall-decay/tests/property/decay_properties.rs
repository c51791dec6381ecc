use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use recall_core::memory::*;
use recall_decay::formula::retrievability;
use recall_decay::review::update_stability;
use recall_decay::{Grade, TierClassifier};

fn arb_tier() -> impl Strategy<Value = ImportanceTier> {
    prop::sample::select(ImportanceTier::ALL.to_vec())
}

fn arb_type() -> impl Strategy<Value = Option<MemoryType>> {
    prop_oneof![Just(None), prop::sample::select(MemoryType::ALL.to_vec()).prop_map(Some)]
}

proptest! {
    #[test]
    fn retrievability_is_bounded(s in -10.0f64..10_000.0, t in -10.0f64..100_000.0) {
        let r = retrievability(s, t);
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn retrievability_never_increases_with_time(
        s in 0.01f64..10_000.0,
        t in 0.0f64..10_000.0,
        dt in 0.0f64..1_000.0,
    ) {
        prop_assert!(retrievability(s, t + dt) <= retrievability(s, t));
    }

    #[test]
    fn protected_or_pinned_always_hot(
        tier in arb_tier(),
        memory_type in arb_type(),
        pinned in any::<bool>(),
        days in 0i64..100_000,
    ) {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut record = MemoryRecord::new("c", "t", "x", now - Duration::days(days));
        record.tier = tier;
        record.memory_type = memory_type;
        record.is_pinned = pinned;

        let c = TierClassifier::default().classify(&record, now);
        prop_assert!((0.0..=1.0).contains(&c.retrievability));
        if pinned || tier.is_protected() {
            prop_assert_eq!(c.state, DecayState::Hot);
            prop_assert_eq!(c.retrievability, 1.0);
        }
    }

    #[test]
    fn grades_order_new_stability(
        s in 1.0f64..1_000.0,
        d in 1.0f64..10.0,
        r in 0.0f64..1.0,
    ) {
        let again = update_stability(s, d, Grade::Again, r);
        let hard = update_stability(s, d, Grade::Hard, r);
        let good = update_stability(s, d, Grade::Good, r);
        let easy = update_stability(s, d, Grade::Easy, r);
        prop_assert!(easy >= good);
        prop_assert!(good >= hard);
        prop_assert!(hard > again);
    }
}
