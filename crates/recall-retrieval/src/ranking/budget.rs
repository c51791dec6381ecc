//! Token-budget truncation of the final result set.

use serde::Serialize;

use recall_core::config::defaults::DEFAULT_TOKEN_BUDGET;
use recall_observability::events;

use super::ScoredResult;

const CHARS_PER_TOKEN: usize = 4;
const SUMMARY_MAX_CHARS: usize = 400;

/// `ceil(chars / 4)`.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Footprint of one result: title, collection, trigger phrases, and the
/// content when it will be returned.
pub fn result_tokens(result: &ScoredResult, include_content: bool) -> usize {
    let record = &result.record;
    let mut chars = record.title.chars().count() + record.collection.chars().count();
    chars += record
        .trigger_phrases
        .iter()
        .map(|p| p.chars().count())
        .sum::<usize>();
    if include_content {
        chars += record.content.chars().count();
    }
    chars.div_ceil(CHARS_PER_TOKEN)
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetResult {
    pub results: Vec<ScoredResult>,
    pub truncated: bool,
    /// Estimated tokens of every candidate before truncation.
    pub total_tokens: usize,
    pub budget: usize,
    /// The single result was replaced by a summary.
    pub summarized: bool,
}

/// Replace the content of an oversized result with a short summary.
pub fn summary_fallback(mut result: ScoredResult, budget: usize) -> ScoredResult {
    let max_chars = SUMMARY_MAX_CHARS.min(budget.saturating_mul(CHARS_PER_TOKEN));
    let content = &result.record.content;
    let excerpt = if content.chars().count() > max_chars {
        format!("{}...", content.chars().take(max_chars).collect::<String>())
    } else {
        content.clone()
    };
    let title = if result.record.title.is_empty() {
        "Untitled"
    } else {
        result.record.title.as_str()
    };
    result.record.content = format!("[Summary] {title}: {excerpt}");
    result
}

/// Keep the highest-scoring results until the budget would be exceeded.
/// At least one result always survives. `budget == 0` means the default.
pub fn truncate_to_budget(
    results: Vec<ScoredResult>,
    budget: usize,
    include_content: bool,
    query_id: &str,
) -> BudgetResult {
    let budget = if budget == 0 { DEFAULT_TOKEN_BUDGET } else { budget };
    if results.is_empty() {
        return BudgetResult {
            results,
            truncated: false,
            total_tokens: 0,
            budget,
            summarized: false,
        };
    }

    let mut sorted = results;
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    let total_tokens: usize = sorted.iter().map(|r| result_tokens(r, include_content)).sum();

    if total_tokens <= budget {
        return BudgetResult {
            results: sorted,
            truncated: false,
            total_tokens,
            budget,
            summarized: false,
        };
    }

    let candidates = sorted.len();
    if candidates == 1 && include_content {
        events::budget_overflow(query_id, 1, total_tokens, budget, 1);
        let summary = sorted.into_iter().map(|r| summary_fallback(r, budget)).collect();
        return BudgetResult {
            results: summary,
            truncated: true,
            total_tokens,
            budget,
            summarized: true,
        };
    }

    let mut kept = Vec::new();
    let mut used = 0;
    for result in sorted {
        let tokens = result_tokens(&result, include_content);
        if used + tokens > budget && !kept.is_empty() {
            break;
        }
        kept.push(result);
        used += tokens;
        if used >= budget {
            break;
        }
    }

    events::budget_overflow(query_id, candidates, total_tokens, budget, kept.len());
    BudgetResult {
        results: kept,
        truncated: true,
        total_tokens,
        budget,
        summarized: false,
    }
}
