use chrono::Utc;
use recall_core::memory::*;

#[test]
fn half_lives_match_type_table() {
    assert_eq!(half_life_days(MemoryType::Working), Some(1.0));
    assert_eq!(half_life_days(MemoryType::Episodic), Some(7.0));
    assert_eq!(half_life_days(MemoryType::Prospective), Some(14.0));
    assert_eq!(half_life_days(MemoryType::Implicit), Some(30.0));
    assert_eq!(half_life_days(MemoryType::Declarative), Some(60.0));
    assert_eq!(half_life_days(MemoryType::Procedural), Some(90.0));
    assert_eq!(half_life_days(MemoryType::Semantic), Some(180.0));
    assert_eq!(half_life_days(MemoryType::Autobiographical), Some(365.0));
    assert_eq!(half_life_days(MemoryType::MetaCognitive), None);
}

#[test]
fn memory_type_parses_kebab_and_snake_case() {
    assert_eq!("meta-cognitive".parse::<MemoryType>().unwrap(), MemoryType::MetaCognitive);
    assert_eq!("Meta_Cognitive".parse::<MemoryType>().unwrap(), MemoryType::MetaCognitive);
    assert!("nonsense".parse::<MemoryType>().is_err());
    assert_eq!(MemoryType::normalize("nonsense"), None);
}

#[test]
fn memory_type_serializes_kebab_case() {
    let json = serde_json::to_string(&MemoryType::MetaCognitive).unwrap();
    assert_eq!(json, "\"meta-cognitive\"");
}

#[test]
fn tier_table_values() {
    assert_eq!(ImportanceTier::Constitutional.value(), 1.0);
    assert_eq!(ImportanceTier::Constitutional.search_boost(), 3.0);
    assert!(ImportanceTier::Constitutional.always_surface());
    assert_eq!(ImportanceTier::Constitutional.max_tokens(), Some(2000));
    assert_eq!(ImportanceTier::Critical.search_boost(), 2.0);
    assert_eq!(ImportanceTier::Important.value(), 0.8);
    assert!(ImportanceTier::Normal.allows_decay());
    assert!(!ImportanceTier::Important.allows_decay());
    assert_eq!(ImportanceTier::Temporary.auto_expire_days(), Some(7));
    assert!(ImportanceTier::Deprecated.is_excluded_from_search());
    assert_eq!(ImportanceTier::Deprecated.apply_boost(0.9), 0.0);
}

#[test]
fn tier_protection_covers_constitutional_and_critical_only() {
    let protected: Vec<_> = ImportanceTier::ALL
        .into_iter()
        .filter(|t| t.is_protected())
        .collect();
    assert_eq!(
        protected,
        vec![ImportanceTier::Constitutional, ImportanceTier::Critical]
    );
}

#[test]
fn tier_normalize_is_lenient() {
    assert_eq!(ImportanceTier::normalize("CRITICAL"), ImportanceTier::Critical);
    assert_eq!(ImportanceTier::normalize(" important "), ImportanceTier::Important);
    assert_eq!(ImportanceTier::normalize(""), ImportanceTier::Normal);
    assert_eq!(ImportanceTier::normalize("bogus"), ImportanceTier::Normal);
    assert!("bogus".parse::<ImportanceTier>().is_err());
}

#[test]
fn tier_ordering_is_by_importance() {
    assert!(ImportanceTier::Constitutional > ImportanceTier::Critical);
    assert!(ImportanceTier::Critical > ImportanceTier::Important);
    assert!(ImportanceTier::Normal > ImportanceTier::Temporary);
    assert!(ImportanceTier::Temporary > ImportanceTier::Deprecated);

    let mut tiers = ImportanceTier::by_importance();
    tiers.reverse();
    tiers.sort_by(|a, b| b.cmp(a));
    assert_eq!(tiers, ImportanceTier::ALL.to_vec());
}

#[test]
fn confidence_clamps_and_steps() {
    assert_eq!(Confidence::new(1.7).value(), 1.0);
    assert_eq!(Confidence::new(-0.3).value(), 0.0);
    assert_eq!(Confidence::new(f64::NAN).value(), Confidence::BASE);
    assert_eq!(Confidence::default().value(), 0.5);

    let up = Confidence::new(0.95).after_validation(true);
    assert_eq!(up.value(), 1.0);
    let down = Confidence::new(0.02).after_validation(false);
    assert_eq!(down.value(), 0.0);
}

#[test]
fn new_record_has_default_decay_and_validation_state() {
    let now = Utc::now();
    let record = MemoryRecord::new("specs/001", "Auth flow", "JWT refresh rotation", now);
    assert_eq!(record.id, 0);
    assert_eq!(record.tier, ImportanceTier::Normal);
    assert_eq!(record.confidence.value(), 0.5);
    assert_eq!(record.validation_count, 0);
    assert_eq!(record.embedding_status, EmbeddingStatus::Pending);
    assert_eq!(record.decay_anchor(), now);
    assert!(!record.is_decay_exempt());
    assert!(!record.is_chunk());
    assert_eq!(
        record.content_hash,
        MemoryRecord::compute_content_hash("JWT refresh rotation")
    );
}

#[test]
fn pinned_and_protected_records_are_decay_exempt() {
    let now = Utc::now();
    let mut record = MemoryRecord::new("c", "t", "x", now);
    record.is_pinned = true;
    assert!(record.is_decay_exempt());

    let mut critical = MemoryRecord::new("c", "t", "x", now);
    critical.tier = ImportanceTier::Critical;
    assert!(critical.is_decay_exempt());
}

#[test]
fn interference_text_joins_title_and_triggers() {
    let mut record = MemoryRecord::new("c", "Auth flow", "x", Utc::now());
    record.trigger_phrases = vec!["jwt".into(), "refresh token".into()];
    assert_eq!(record.interference_text(), "Auth flow jwt refresh token");
}

#[test]
fn decay_state_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&DecayState::Dormant).unwrap(), "\"DORMANT\"");
    assert_eq!(DecayState::Archived.to_string(), "ARCHIVED");
}

#[test]
fn embedding_status_normalizes_unknown_to_pending() {
    assert_eq!(EmbeddingStatus::normalize("FAILED"), EmbeddingStatus::Failed);
    assert_eq!(EmbeddingStatus::normalize("???"), EmbeddingStatus::Pending);
}

mod properties {
    use proptest::prelude::*;
    use recall_core::memory::Confidence;

    proptest! {
        #[test]
        fn confidence_stays_in_unit_interval(start in -2.0f64..3.0, events in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut c = Confidence::new(start);
            for useful in events {
                c = c.after_validation(useful);
                prop_assert!((0.0..=1.0).contains(&c.value()));
            }
        }
    }
}
