use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use recall_core::config::{FeatureFlags, ScoringConfig, ScoringModel};
use recall_core::memory::ImportanceTier;
use recall_retrieval::fusion::rrf::{fuse, RrfParams};
use recall_retrieval::fusion::rsf::rsf_fuse_multi;
use recall_retrieval::ranking::normalize::normalize_scores;
use recall_retrieval::ranking::truncation::{truncate_by_confidence, TruncationParams};
use recall_retrieval::{Channel, CompositeScorer, RankedList, ScoringInput};

fn arb_channel() -> impl Strategy<Value = Channel> {
    prop::sample::select(vec![
        Channel::Vector,
        Channel::Fts,
        Channel::Bm25,
        Channel::Graph,
        Channel::Keyword,
    ])
}

fn arb_list() -> impl Strategy<Value = RankedList> {
    (arb_channel(), prop::collection::vec((0i64..40, -5.0f64..50.0), 0..15))
        .prop_map(|(channel, scored)| RankedList::from_scored(channel, &scored))
}

fn arb_flags() -> impl Strategy<Value = FeatureFlags> {
    prop::array::uniform6(any::<bool>()).prop_map(|f| FeatureFlags {
        novelty_boost: f[0],
        interference_penalty: f[1],
        score_normalization: f[2],
        rsf_fusion: f[3],
        channel_min_representation: f[4],
        confidence_truncation: f[5],
    })
}

fn arb_input() -> impl Strategy<Value = ScoringInput> {
    (
        -50.0f64..500.0,
        prop::option::of(-1.0f64..3.0),
        prop::sample::select(ImportanceTier::ALL.to_vec()),
        prop::option::of(-2.0f64..2.0),
        -1_000i64..100_000,
        0u32..20,
        0u64..1_000,
    )
        .prop_map(|(similarity, weight, tier, r, age_hours, interference, access)| {
            let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            let at = now - Duration::hours(age_hours);
            ScoringInput {
                similarity,
                importance_weight: weight,
                tier,
                retrievability: r,
                created_at: Some(at),
                updated_at: Some(at),
                interference_count: interference,
                access_count: access,
                title: "property".into(),
                ..ScoringInput::default()
            }
        })
}

proptest! {
    #[test]
    fn composite_score_is_bounded(
        input in arb_input(),
        flags in arb_flags(),
        five in any::<bool>(),
    ) {
        let config = ScoringConfig {
            model: if five { ScoringModel::FiveFactor } else { ScoringModel::SixFactor },
            ..ScoringConfig::default()
        };
        let scorer = CompositeScorer::new(&config, flags);
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let b = scorer.breakdown(&input, Some("property test"), now);
        prop_assert!((0.0..=1.0).contains(&b.total));
        prop_assert!((0.0..=1.0).contains(&b.base));
        if b.novelty_boost > 0.0 {
            prop_assert!(b.total <= config.novelty_score_cap);
        }
    }

    #[test]
    fn normalization_preserves_order(scores in prop::collection::vec(-100.0f64..100.0, 0..30)) {
        let out = normalize_scores(&scores);
        prop_assert_eq!(out.len(), scores.len());
        for v in &out {
            prop_assert!((0.0..=1.0).contains(v));
        }
        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] < scores[j] {
                    prop_assert!(out[i] <= out[j]);
                }
            }
        }
    }

    #[test]
    fn rsf_scores_are_bounded(lists in prop::collection::vec(arb_list(), 0..5)) {
        for r in rsf_fuse_multi(&lists) {
            prop_assert!((0.0..=1.0).contains(&r.score));
        }
    }

    #[test]
    fn rrf_extra_list_never_lowers_a_score(
        lists in prop::collection::vec(arb_list(), 1..4),
        extra in arb_list(),
    ) {
        let params = RrfParams::default();
        let before = fuse(&lists, &params);
        let mut more = lists.clone();
        more.push(extra);
        let after = fuse(&more, &params);
        for b in &before {
            let a = after.iter().find(|r| r.id == b.id).map(|r| r.score).unwrap_or(-1.0);
            prop_assert!(a + 1e-12 >= b.score);
        }
    }

    #[test]
    fn rrf_output_is_sorted_and_unique(lists in prop::collection::vec(arb_list(), 0..5)) {
        let fused = fuse(&lists, &RrfParams::default());
        prop_assert!(fused.windows(2).all(|w| w[0].score >= w[1].score));
        let mut ids: Vec<i64> = fused.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), fused.len());
    }

    #[test]
    fn truncation_keeps_a_sorted_prefix(
        scores in prop::collection::vec(0.0f64..1.0, 0..25),
        min_results in 1usize..6,
    ) {
        let params = TruncationParams { min_results, gap_multiplier: 2.0 };
        let out = truncate_by_confidence(scores.clone(), &params, true);
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        prop_assert!(out.results.len() >= min_results.min(scores.len()));
        prop_assert_eq!(&out.results[..], &sorted[..out.results.len()]);
    }
}
