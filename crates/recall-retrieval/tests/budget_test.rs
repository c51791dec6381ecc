use chrono::{TimeZone, Utc};

use recall_core::memory::{DecayState, MemoryRecord};
use recall_retrieval::ranking::budget::{estimate_tokens, result_tokens, truncate_to_budget};
use recall_retrieval::{CompositeScorer, ScoredResult, ScoringInput};

fn result(id: i64, score: f64, title_chars: usize, content_chars: usize) -> ScoredResult {
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let mut record = MemoryRecord::new("", "t".repeat(title_chars), "c".repeat(content_chars), now);
    record.id = id;
    ScoredResult {
        record,
        score,
        fusion_score: score,
        sources: Vec::new(),
        promoted_from: None,
        state: DecayState::Hot,
        retrievability: 1.0,
        breakdown: CompositeScorer::default().breakdown(&ScoringInput::default(), None, now),
    }
}

fn ids(results: &[ScoredResult]) -> Vec<i64> {
    results.iter().map(|r| r.record.id).collect()
}

#[test]
fn token_estimate_rounds_up() {
    assert_eq!(estimate_tokens(""), 0);
    assert_eq!(estimate_tokens("abcd"), 1);
    assert_eq!(estimate_tokens("abcde"), 2);
    // Chars, not bytes.
    assert_eq!(estimate_tokens("éééé"), 1);
}

#[test]
fn result_tokens_count_content_only_when_returned() {
    let r = result(1, 0.5, 40, 400);
    assert_eq!(result_tokens(&r, false), 10);
    assert_eq!(result_tokens(&r, true), 110);
}

#[test]
fn everything_fits_under_budget() {
    let results = vec![result(1, 0.9, 40, 0), result(2, 0.8, 40, 0), result(3, 0.7, 40, 0)];
    let out = truncate_to_budget(results, 100, false, "q-1");

    assert!(!out.truncated);
    assert_eq!(out.results.len(), 3);
    assert_eq!(out.total_tokens, 30);
    assert_eq!(out.budget, 100);
}

#[test]
fn greedy_accumulation_stops_before_overflow() {
    let results = (1..=5).map(|i| result(i, 1.0 - i as f64 * 0.1, 400, 0)).collect();
    let out = truncate_to_budget(results, 250, false, "q-2");

    assert!(out.truncated);
    assert_eq!(ids(&out.results), vec![1, 2]);
    assert_eq!(out.total_tokens, 500);
    assert!(!out.summarized);
}

#[test]
fn accumulation_stops_once_budget_is_reached() {
    let results = (1..=5).map(|i| result(i, 1.0 - i as f64 * 0.1, 400, 0)).collect();
    let out = truncate_to_budget(results, 200, false, "q-3");
    assert_eq!(ids(&out.results), vec![1, 2]);
}

#[test]
fn at_least_one_result_survives() {
    let results = vec![result(1, 0.9, 1_000, 0), result(2, 0.8, 10, 0)];
    let out = truncate_to_budget(results, 100, false, "q-4");
    assert!(out.truncated);
    assert_eq!(ids(&out.results), vec![1]);
}

#[test]
fn single_oversized_result_is_summarized() {
    let mut r = result(1, 0.9, 0, 4_000);
    r.record.title = "Runbook".into();
    let out = truncate_to_budget(vec![r], 50, true, "q-5");

    assert!(out.truncated);
    assert!(out.summarized);
    let content = &out.results[0].record.content;
    let expected = format!("[Summary] Runbook: {}...", "c".repeat(200));
    assert_eq!(content, &expected);
}

#[test]
fn summary_excerpt_is_capped_at_four_hundred_chars() {
    let out = truncate_to_budget(vec![result(1, 0.9, 0, 10_000)], 1_000, true, "q-6");
    let content = &out.results[0].record.content;
    assert_eq!(content, &format!("[Summary] Untitled: {}...", "c".repeat(400)));
}

#[test]
fn zero_budget_means_default() {
    let out = truncate_to_budget(vec![result(1, 0.9, 40, 0)], 0, false, "q-7");
    assert_eq!(out.budget, 2_000);
}

#[test]
fn results_come_back_best_first() {
    let results = vec![result(1, 0.2, 4, 0), result(2, 0.9, 4, 0), result(3, 0.5, 4, 0)];
    let out = truncate_to_budget(results, 1_000, false, "q-8");
    assert_eq!(ids(&out.results), vec![2, 3, 1]);
}

#[test]
fn empty_input() {
    let out = truncate_to_budget(Vec::new(), 100, true, "q-9");
    assert!(out.results.is_empty());
    assert!(!out.truncated);
    assert_eq!(out.total_tokens, 0);
}
