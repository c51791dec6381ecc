//! Relative Score Fusion. Raw scores are min-max normalized per list and
//! combined, so every output lies in [0, 1].

use std::collections::{BTreeMap, HashMap, HashSet};

use recall_core::config::defaults::DEFAULT_CONVERGENCE_BONUS;

use super::{sort_fused, FusionResult, RankedList};

/// Normalized score per id for one list. Duplicate ids keep their first entry.
fn normalized(list: &RankedList) -> Vec<(i64, f64)> {
    let mut seen = HashSet::new();
    let raw: Vec<(i64, f64)> = list
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| seen.insert(item.id))
        .map(|(rank, item)| (item.id, list.effective_score(rank)))
        .collect();

    let (min, max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, s)| (lo.min(*s), hi.max(*s)));
    let range = max - min;
    raw.into_iter()
        .map(|(id, s)| {
            let n = if range > 0.0 { (s - min) / range } else { 1.0 };
            (id, n.clamp(0.0, 1.0))
        })
        .collect()
}

struct Accum {
    result: FusionResult,
    sum: f64,
    lists: usize,
}

fn accumulate(lists: &[RankedList]) -> HashMap<i64, Accum> {
    let mut by_id: HashMap<i64, Accum> = HashMap::new();
    for list in lists {
        for (id, score) in normalized(list) {
            let acc = by_id.entry(id).or_insert_with(|| Accum {
                result: FusionResult::new(id),
                sum: 0.0,
                lists: 0,
            });
            acc.result.add_source(list.channel, score);
            acc.sum += score;
            acc.lists += 1;
        }
    }
    by_id
}

fn finish(mut results: Vec<FusionResult>) -> Vec<FusionResult> {
    for r in &mut results {
        r.score = r.score.clamp(0.0, 1.0);
    }
    sort_fused(&mut results);
    results
}

/// Two lists: the mean of both normalized scores where an id is in both,
/// half its normalized score where it is in one.
pub fn rsf_fuse_pair(a: &RankedList, b: &RankedList) -> Vec<FusionResult> {
    let results = accumulate(&[a.clone(), b.clone()])
        .into_values()
        .map(|acc| {
            let mut result = acc.result;
            result.score = if acc.lists >= 2 { acc.sum / 2.0 } else { acc.sum * 0.5 };
            result
        })
        .collect();
    finish(results)
}

/// Any number of lists: mean normalized score over the lists containing the
/// id, scaled by the fraction of lists that contain it. Empty lists still
/// count toward the total.
pub fn rsf_fuse_multi(lists: &[RankedList]) -> Vec<FusionResult> {
    let total = lists.len();
    if total == 0 {
        return Vec::new();
    }
    let results = accumulate(lists)
        .into_values()
        .map(|acc| {
            let mut result = acc.result;
            let mean = acc.sum / acc.lists as f64;
            result.score = mean * (acc.lists as f64 / total as f64);
            result
        })
        .collect();
    finish(results)
}

/// Multi-fuse each variant, average per id over all variants (absent counts
/// as 0), and add the convergence bonus for ids found by several variants.
pub fn rsf_fuse_cross_variant(variants: &[Vec<RankedList>]) -> Vec<FusionResult> {
    let total = variants.len();
    if total == 0 {
        return Vec::new();
    }

    let mut by_id: BTreeMap<i64, (FusionResult, f64, usize)> = BTreeMap::new();
    for variant in variants {
        for fused in rsf_fuse_multi(variant) {
            match by_id.get_mut(&fused.id) {
                Some((combined, sum, count)) => {
                    *sum += fused.score;
                    *count += 1;
                    for (channel, score) in &fused.source_scores {
                        combined.add_source(*channel, *score);
                    }
                }
                None => {
                    let score = fused.score;
                    by_id.insert(fused.id, (fused, score, 1));
                }
            }
        }
    }

    let results = by_id
        .into_values()
        .map(|(mut result, sum, count)| {
            let bonus = DEFAULT_CONVERGENCE_BONUS * count.saturating_sub(1) as f64;
            result.convergence_bonus = bonus;
            result.score = sum / total as f64 + bonus;
            result
        })
        .collect();
    finish(results)
}
