//! RetrievalPipeline: channel lists → fusion → (representation) → composite
//! scoring → (normalization) → sort → (confidence truncation) → token budget.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use recall_core::config::RecallConfig;
use recall_core::errors::RecallResult;
use recall_core::memory::MemoryRecord;
use recall_core::traits::IMemoryStore;
use recall_decay::TierClassifier;
use recall_observability::{events, retrieval_span};

use crate::fusion::channel::{analyze_channel_representation, RepresentationReport};
use crate::fusion::rrf::{self, RrfParams};
use crate::fusion::rsf;
use crate::fusion::{Channel, FusionResult, RankedList};
use crate::ranking::budget::truncate_to_budget;
use crate::ranking::interference::interference_counts_from_store;
use crate::ranking::normalize::normalize_if;
use crate::ranking::scorer::{CompositeScorer, ScoringInput};
use crate::ranking::truncation::{truncate_by_confidence, TruncationParams};
use crate::ranking::{sort_scored, ScoredResult};

/// One query's channel output.
#[derive(Debug, Clone, Default)]
pub struct RetrievalRequest {
    pub query: String,
    /// Channel lists for the query as written.
    pub lists: Vec<RankedList>,
    /// Channel lists for reformulations of the query. When non-empty, fusion
    /// runs across `lists` and every variant.
    pub variants: Vec<Vec<RankedList>>,
    pub include_content: bool,
    /// Overrides the configured token budget.
    pub token_budget: Option<usize>,
    /// Overrides the configured fused top-K.
    pub top_k: Option<usize>,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>, lists: Vec<RankedList>) -> Self {
        Self {
            query: query.into(),
            lists,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResponse {
    pub query_id: String,
    pub results: Vec<ScoredResult>,
    /// Fused candidates before top-K.
    pub fused_count: usize,
    pub representation: Option<RepresentationReport>,
    pub confidence_truncated: bool,
    pub budget_truncated: bool,
    pub total_tokens: usize,
}

/// The query pipeline. Holds no state between queries.
pub struct RetrievalPipeline<'a> {
    store: &'a dyn IMemoryStore,
    config: &'a RecallConfig,
    scorer: CompositeScorer,
    classifier: TierClassifier,
}

impl<'a> RetrievalPipeline<'a> {
    pub fn new(store: &'a dyn IMemoryStore, config: &'a RecallConfig) -> Self {
        Self {
            store,
            config,
            scorer: CompositeScorer::new(&config.scoring, config.flags),
            classifier: TierClassifier::new(&config.decay),
        }
    }

    pub fn retrieve(&self, request: &RetrievalRequest) -> RecallResult<RetrievalResponse> {
        self.retrieve_at(request, Utc::now())
    }

    /// Run the pipeline with an explicit clock.
    pub fn retrieve_at(&self, request: &RetrievalRequest, now: DateTime<Utc>) -> RecallResult<RetrievalResponse> {
        let query_id = Uuid::new_v4().to_string();
        let _span = retrieval_span!(query_id, request.lists.len()).entered();
        let flags = self.config.flags;
        let retrieval = &self.config.retrieval;

        // Stage 1: fusion.
        let mut fused = self.fuse(request);
        let fused_count = fused.len();
        debug!(fused = fused_count, rsf = flags.rsf_fusion, "fusion complete");
        if fused.is_empty() {
            return Ok(self.empty_response(query_id));
        }

        // Stage 2: hydrate. Missing, archived, and search-excluded records drop out.
        let ids: Vec<i64> = fused.iter().map(|f| f.id).collect();
        let records: HashMap<i64, MemoryRecord> = self
            .store
            .get_bulk(&ids)?
            .into_iter()
            .filter(|r| !r.is_archived && !r.tier.is_excluded_from_search())
            .map(|r| (r.id, r))
            .collect();
        fused.retain(|f| records.contains_key(&f.id));

        if !flags.rsf_fusion {
            rrf::apply_term_match_bonus(&mut fused, &request.query, retrieval.term_match_bonus, |id| {
                records.get(&id).map(searchable_text)
            });
        }
        rrf::normalize_fusion_scores(&mut fused, flags.score_normalization);

        // Stage 3: top-K and channel representation.
        fused.truncate(request.top_k.unwrap_or(retrieval.top_k));
        let all_lists: Vec<RankedList> = request
            .lists
            .iter()
            .chain(request.variants.iter().flatten())
            .map(|l| {
                let mut list = l.clone();
                list.items.retain(|i| records.contains_key(&i.id));
                list
            })
            .filter(|l| !l.is_empty())
            .collect();
        let representation = flags.channel_min_representation.then(|| {
            analyze_channel_representation(
                fused.clone(),
                &all_lists,
                retrieval.channel_quality_floor,
                true,
            )
        });
        let top_k = match &representation {
            Some(report) => report.top_k.clone(),
            None => fused,
        };

        // Stage 4: composite scoring.
        let mut scored = self.score_candidates(&top_k, &records, &request.lists, &request.query, now);

        // Stage 5: truncation.
        let truncation = truncate_by_confidence(
            std::mem::take(&mut scored),
            &TruncationParams::from_config(retrieval),
            flags.confidence_truncation,
        );
        let budget = truncate_to_budget(
            truncation.results,
            request.token_budget.unwrap_or(retrieval.token_budget),
            request.include_content,
            &query_id,
        );

        info!(
            query_id = %query_id,
            fused = fused_count,
            returned = budget.results.len(),
            tokens = budget.total_tokens,
            "retrieval complete"
        );

        Ok(RetrievalResponse {
            query_id,
            results: budget.results,
            fused_count,
            representation,
            confidence_truncated: truncation.truncated,
            budget_truncated: budget.truncated,
            total_tokens: budget.total_tokens,
        })
    }

    fn fuse(&self, request: &RetrievalRequest) -> Vec<FusionResult> {
        let rsf_mode = self.config.flags.rsf_fusion;
        if request.variants.is_empty() {
            return if rsf_mode {
                rsf::rsf_fuse_multi(&request.lists)
            } else {
                rrf::fuse(&request.lists, &RrfParams::from_config(&self.config.retrieval))
            };
        }

        let mut variants = Vec::with_capacity(request.variants.len() + 1);
        variants.push(request.lists.clone());
        variants.extend(request.variants.iter().cloned());
        if rsf_mode {
            rsf::rsf_fuse_cross_variant(&variants)
        } else {
            rrf::fuse_cross_variant(&variants, &RrfParams::from_config(&self.config.retrieval))
        }
    }

    fn score_candidates(
        &self,
        candidates: &[FusionResult],
        records: &HashMap<i64, MemoryRecord>,
        lists: &[RankedList],
        query: &str,
        now: DateTime<Utc>,
    ) -> Vec<ScoredResult> {
        let flags = self.config.flags;
        let hydrated: Vec<(&FusionResult, &MemoryRecord)> = candidates
            .iter()
            .filter_map(|c| records.get(&c.id).map(|r| (c, r)))
            .collect();

        let interference = if flags.interference_penalty {
            let owned: Vec<MemoryRecord> = hydrated.iter().map(|(_, r)| (*r).clone()).collect();
            match interference_counts_from_store(
                self.store,
                &owned,
                self.config.scoring.interference_threshold,
            ) {
                Ok(counts) => counts,
                Err(e) => {
                    events::degradation_triggered("interference_counts", &e.to_string(), "no penalty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        let vector_scores = vector_similarities(lists);
        let max_fused = candidates
            .iter()
            .map(|c| c.score)
            .filter(|s| s.is_finite())
            .fold(0.0_f64, f64::max);
        let query = (!query.trim().is_empty()).then_some(query);

        let mut scored: Vec<ScoredResult> = hydrated
            .into_iter()
            .map(|(candidate, record)| {
                let similarity = match vector_scores.get(&record.id) {
                    Some(s) => s * 100.0,
                    None if max_fused > 0.0 => candidate.score / max_fused * 100.0,
                    None => 0.0,
                };
                let classification = self.classifier.classify(record, now);
                let input = ScoringInput::from_record(record, similarity)
                    .with_retrievability(classification.retrievability)
                    .with_interference(interference.get(&record.id).copied().unwrap_or(0));
                let breakdown = self.scorer.breakdown(&input, query, now);
                ScoredResult {
                    record: record.clone(),
                    score: breakdown.total,
                    fusion_score: candidate.score,
                    sources: candidate.sources.clone(),
                    promoted_from: candidate.promoted_from,
                    state: classification.state,
                    retrievability: classification.retrievability,
                    breakdown,
                }
            })
            .collect();

        let raw: Vec<f64> = scored.iter().map(|s| s.score).collect();
        for (result, score) in scored.iter_mut().zip(normalize_if(&raw, flags.score_normalization)) {
            result.score = score;
        }
        sort_scored(&mut scored);
        scored
    }

    fn empty_response(&self, query_id: String) -> RetrievalResponse {
        debug!("no candidates");
        RetrievalResponse {
            query_id,
            results: Vec::new(),
            fused_count: 0,
            representation: None,
            confidence_truncated: false,
            budget_truncated: false,
            total_tokens: 0,
        }
    }
}

/// Raw vector-channel score per id, clamped to [0, 1]. First occurrence wins.
fn vector_similarities(lists: &[RankedList]) -> HashMap<i64, f64> {
    let mut out = HashMap::new();
    let mut seen = HashSet::new();
    for list in lists.iter().filter(|l| l.channel == Channel::Vector) {
        for item in &list.items {
            if let Some(score) = item.score.filter(|s| s.is_finite()) {
                if seen.insert(item.id) {
                    out.insert(item.id, score.clamp(0.0, 1.0));
                }
            }
        }
    }
    out
}

/// Title, trigger phrases, and collection, for term matching.
fn searchable_text(record: &MemoryRecord) -> String {
    let mut text = record.interference_text();
    text.push(' ');
    text.push_str(&record.collection);
    text
}
