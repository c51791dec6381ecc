use recall_retrieval::fusion::channel::analyze_channel_representation;
use recall_retrieval::fusion::rrf::{fuse, RrfParams};
use recall_retrieval::{Channel, FusionResult, RankedList};

const FLOOR: f64 = 0.2;

fn top_k_from(lists: &[RankedList], k: usize) -> Vec<FusionResult> {
    let mut fused = fuse(lists, &RrfParams::default());
    fused.truncate(k);
    fused
}

#[test]
fn fully_represented_channels_are_left_alone() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9), (2, 0.8)]),
        RankedList::from_scored(Channel::Fts, &[(2, 3.0), (1, 2.0)]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists, 2), &lists, FLOOR, true);

    assert!(report.promoted.is_empty());
    assert!(report.under_represented.is_empty());
    assert_eq!(report.top_k.len(), 2);
    assert_eq!(report.channel_counts.get(&Channel::Vector), Some(&2));
    assert_eq!(report.channel_counts.get(&Channel::Fts), Some(&2));
}

#[test]
fn missing_channel_gets_its_best_candidate_promoted() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9), (2, 0.8), (3, 0.7)]),
        RankedList::from_scored(Channel::Graph, &[(9, 0.6), (8, 0.4)]),
    ];
    let top_k = top_k_from(&lists[..1], 2);
    let report = analyze_channel_representation(top_k, &lists, FLOOR, true);

    assert_eq!(report.under_represented, vec![Channel::Graph]);
    assert_eq!(report.promotion_count(), 1);
    let promoted = &report.promoted[0];
    assert_eq!(promoted.id, 9);
    assert_eq!(promoted.promoted_from, Some(Channel::Graph));
    assert_eq!(promoted.score, 0.6);
    assert_eq!(report.top_k.len(), 3);
    assert_eq!(report.channel_counts.get(&Channel::Graph), Some(&1));
}

#[test]
fn candidate_below_floor_is_not_promoted_but_channel_is_reported() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_scored(Channel::Fts, &[(5, 0.1)]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 1), &lists, FLOOR, true);

    assert!(report.promoted.is_empty());
    assert_eq!(report.under_represented, vec![Channel::Fts]);
    assert_eq!(report.top_k.len(), 1);
    assert_eq!(report.channel_counts.get(&Channel::Fts), None);
}

#[test]
fn floor_is_inclusive() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_scored(Channel::Fts, &[(5, 0.2)]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 1), &lists, FLOOR, true);
    assert_eq!(report.promoted.len(), 1);
}

#[test]
fn empty_channels_are_never_flagged() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_ids(Channel::Keyword, &[]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 1), &lists, FLOOR, true);
    assert!(report.under_represented.is_empty());
    assert!(report.promoted.is_empty());
}

#[test]
fn promotion_skips_ids_already_in_top_k() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9), (2, 0.8)]),
        RankedList::from_scored(Channel::Bm25, &[(1, 9.0), (6, 0.5)]),
    ];
    // Fused without bm25: the channel is missing even though its best id is present.
    let top_k = top_k_from(&lists[..1], 2);
    let report = analyze_channel_representation(top_k, &lists, FLOOR, true);

    assert_eq!(report.under_represented, vec![Channel::Bm25]);
    assert_eq!(report.promoted.len(), 1);
    assert_eq!(report.promoted[0].id, 6);
}

#[test]
fn unscored_lists_fall_back_to_rank_scores() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_ids(Channel::Fts, &[7, 8, 9]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 1), &lists, FLOOR, true);
    assert_eq!(report.promoted[0].id, 7);
    assert_eq!(report.promoted[0].score, 1.0);
}

#[test]
fn each_missing_channel_promotes_independently() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_scored(Channel::Fts, &[(2, 0.5)]),
        RankedList::from_scored(Channel::Graph, &[(3, 0.4)]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 1), &lists, FLOOR, true);
    assert_eq!(report.under_represented, vec![Channel::Fts, Channel::Graph]);
    let mut promoted: Vec<i64> = report.promoted.iter().map(|p| p.id).collect();
    promoted.sort_unstable();
    assert_eq!(promoted, vec![2, 3]);
    assert_eq!(report.top_k.len(), 3);
}

#[test]
fn same_id_is_not_promoted_twice() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_scored(Channel::Fts, &[(4, 0.5)]),
        RankedList::from_scored(Channel::Keyword, &[(4, 0.6), (5, 0.3)]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 1), &lists, FLOOR, true);
    let promoted: Vec<i64> = report.promoted.iter().map(|p| p.id).collect();
    assert_eq!(promoted, vec![4, 5]);
}

#[test]
fn disabled_returns_input_unchanged() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9)]),
        RankedList::from_scored(Channel::Fts, &[(5, 0.9)]),
    ];
    let top_k = top_k_from(&lists[..1], 1);
    let report = analyze_channel_representation(top_k.clone(), &lists, FLOOR, false);
    assert_eq!(report.top_k, top_k);
    assert!(report.promoted.is_empty());
    assert!(report.under_represented.is_empty());
}

#[test]
fn empty_top_k_or_lists_is_a_no_op() {
    let lists = vec![RankedList::from_scored(Channel::Fts, &[(5, 0.9)])];
    assert!(analyze_channel_representation(Vec::new(), &lists, FLOOR, true)
        .top_k
        .is_empty());

    let top_k = top_k_from(&lists, 1);
    let report = analyze_channel_representation(top_k, &[], FLOOR, true);
    assert_eq!(report.top_k.len(), 1);
}

#[test]
fn final_top_k_is_sorted_by_score() {
    let lists = vec![
        RankedList::from_scored(Channel::Vector, &[(1, 0.9), (2, 0.8)]),
        RankedList::from_scored(Channel::Graph, &[(9, 0.95)]),
    ];
    let report = analyze_channel_representation(top_k_from(&lists[..1], 2), &lists, FLOOR, true);
    // The promoted raw score outranks the small RRF scores.
    assert_eq!(report.top_k[0].id, 9);
    let scores: Vec<f64> = report.top_k.iter().map(|r| r.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}
