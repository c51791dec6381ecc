//! Channel representation: every channel that returned something gets one
//! chance to appear in the final top-K.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{sort_fused, Channel, FusionResult, RankedList};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentationReport {
    /// Top-K after promotion, re-sorted.
    pub top_k: Vec<FusionResult>,
    pub promoted: Vec<FusionResult>,
    /// Channels with results but none in the incoming top-K, whether or not
    /// a candidate cleared the floor.
    pub under_represented: Vec<Channel>,
    /// How many final top-K items each channel contributed to.
    pub channel_counts: BTreeMap<Channel, usize>,
}

impl RepresentationReport {
    fn unchanged(top_k: Vec<FusionResult>) -> Self {
        let channel_counts = count_channels(&top_k);
        Self {
            top_k,
            promoted: Vec::new(),
            under_represented: Vec::new(),
            channel_counts,
        }
    }

    pub fn promotion_count(&self) -> usize {
        self.promoted.len()
    }
}

fn count_channels(top_k: &[FusionResult]) -> BTreeMap<Channel, usize> {
    let mut counts = BTreeMap::new();
    for result in top_k {
        for channel in &result.sources {
            *counts.entry(*channel).or_insert(0) += 1;
        }
    }
    counts
}

/// Promote the best unused candidate of each under-represented channel whose
/// raw score reaches `quality_floor`. Returns `top_k` untouched when disabled.
pub fn analyze_channel_representation(
    top_k: Vec<FusionResult>,
    lists: &[RankedList],
    quality_floor: f64,
    enabled: bool,
) -> RepresentationReport {
    if !enabled || top_k.is_empty() || lists.is_empty() {
        return RepresentationReport::unchanged(top_k);
    }

    let represented = count_channels(&top_k);
    let mut under_represented = Vec::new();
    let mut promoted: Vec<FusionResult> = Vec::new();

    for list in lists {
        if list.is_empty()
            || represented.contains_key(&list.channel)
            || under_represented.contains(&list.channel)
        {
            continue;
        }
        under_represented.push(list.channel);

        let best = list
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                !top_k.iter().any(|r| r.id == item.id) && !promoted.iter().any(|p| p.id == item.id)
            })
            .map(|(rank, item)| (item.id, list.effective_score(rank)))
            .fold(None::<(i64, f64)>, |best, cand| match best {
                Some(b) if b.1 >= cand.1 => Some(b),
                _ => Some(cand),
            });

        if let Some((id, score)) = best.filter(|(_, s)| *s >= quality_floor) {
            let mut result = FusionResult::new(id);
            result.score = score;
            result.add_source(list.channel, score);
            result.promoted_from = Some(list.channel);
            tracing::debug!(id, channel = %list.channel, score, "channel candidate promoted");
            promoted.push(result);
        }
    }

    let mut top_k = top_k;
    top_k.extend(promoted.iter().cloned());
    sort_fused(&mut top_k);
    let channel_counts = count_channels(&top_k);

    RepresentationReport {
        top_k,
        promoted,
        under_represented,
        channel_counts,
    }
}
