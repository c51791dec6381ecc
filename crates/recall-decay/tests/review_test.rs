use chrono::{Duration, TimeZone, Utc};

use recall_core::errors::RecallError;
use recall_core::memory::MemoryRecord;
use recall_core::traits::IMemoryStore;
use recall_decay::formula::optimal_interval;
use recall_decay::review::{process_review, update_difficulty, update_stability};
use recall_decay::{apply_review, FsrsParams, Grade};
use recall_storage::StorageEngine;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn first_review_from_defaults() {
    let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
    let params = FsrsParams::default();

    let good = process_review(&params, Grade::Good, now);
    assert!(approx(good.stability, 1.6));
    assert!(approx(good.difficulty, 5.0));
    assert_eq!(good.review_count, 1);
    assert_eq!(good.last_review, now);
    assert!(approx(good.retrievability, 1.0));
    assert_eq!(good.next_review, now + Duration::days(2));

    let again = process_review(&params, Grade::Again, now);
    assert!(approx(again.stability, 0.2));
    assert!(approx(again.difficulty, 6.0));

    let easy = process_review(&params, Grade::Easy, now);
    assert!(approx(easy.stability, 2.08));
    assert!(approx(easy.difficulty, 4.5));

    let hard = process_review(&params, Grade::Hard, now);
    assert!(approx(hard.stability, 1.28));
    assert!(approx(hard.difficulty, 5.5));
}

#[test]
fn lower_retrievability_earns_a_larger_bonus() {
    let fresh = update_stability(10.0, 5.0, Grade::Good, 1.0);
    let faded = update_stability(10.0, 5.0, Grade::Good, 0.2);
    assert!(faded > fresh);
    assert!(approx(faded, 10.0 * 1.6 * 1.4));
}

#[test]
fn stability_and_difficulty_are_bounded() {
    assert!(approx(update_stability(0.1, 5.0, Grade::Again, 0.5), 0.1));
    assert!(approx(update_difficulty(10.0, Grade::Again), 10.0));
    assert!(approx(update_difficulty(1.0, Grade::Easy), 1.0));
}

#[test]
fn optimal_interval_at_ninety_percent_equals_stability() {
    assert_eq!(optimal_interval(10.0, 0.9), 10);
    assert_eq!(optimal_interval(0.2, 0.9), 1);
    assert_eq!(optimal_interval(0.0, 0.9), 1);
    assert_eq!(optimal_interval(5.0, 1.0), 1);
    assert_eq!(optimal_interval(5.0, 0.0), 1);
}

#[test]
fn grade_parsing() {
    assert_eq!(Grade::try_from(3u8).unwrap(), Grade::Good);
    assert!(matches!(
        Grade::try_from(0u8),
        Err(RecallError::InvalidInput { .. })
    ));
    assert!(Grade::try_from(5u8).is_err());
}

#[test]
fn apply_review_persists_new_state() {
    let store = StorageEngine::open_in_memory().unwrap();
    let created = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
    let id = store
        .create(&MemoryRecord::new("col", "reviewed", "body", created))
        .unwrap();

    let at = created + Duration::days(3);
    let result = apply_review(&store, id, Grade::Good, at).unwrap();

    let stored = store.get(id).unwrap().unwrap();
    assert_eq!(stored.last_review, Some(at));
    assert_eq!(stored.review_count, 1);
    assert!(approx(stored.stability.unwrap(), result.stability));
    assert!(approx(stored.difficulty, result.difficulty));
}

#[test]
fn apply_review_missing_record() {
    let store = StorageEngine::open_in_memory().unwrap();
    let err = apply_review(&store, 77, Grade::Good, Utc::now()).unwrap_err();
    assert!(matches!(err, RecallError::NotFound { id: 77 }));
}
