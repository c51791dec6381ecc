use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};

use recall_core::config::FeatureFlags;
use recall_retrieval::fusion::rrf::{fuse, RrfParams};
use recall_retrieval::fusion::rsf::rsf_fuse_multi;
use recall_retrieval::{Channel, CompositeScorer, RankedList, ScoringInput};

fn make_lists(n: i64) -> Vec<RankedList> {
    let vector: Vec<(i64, f64)> = (0..n).map(|i| (i, 1.0 - i as f64 / n as f64)).collect();
    let fts: Vec<(i64, f64)> = (0..n).rev().map(|i| (i * 2, i as f64)).collect();
    vec![
        RankedList::from_scored(Channel::Vector, &vector),
        RankedList::from_scored(Channel::Fts, &fts),
        RankedList::from_ids(Channel::Graph, &(0..n / 4).collect::<Vec<_>>()),
    ]
}

fn bench_rrf_3x200(c: &mut Criterion) {
    let lists = make_lists(200);
    let params = RrfParams::default();
    c.bench_function("rrf_3x200", |b| b.iter(|| fuse(&lists, &params).len()));
}

fn bench_rsf_3x200(c: &mut Criterion) {
    let lists = make_lists(200);
    c.bench_function("rsf_3x200", |b| b.iter(|| rsf_fuse_multi(&lists).len()));
}

fn bench_score_1k(c: &mut Criterion) {
    let scorer = CompositeScorer::new(&Default::default(), FeatureFlags::all());
    let now = Utc::now();
    let inputs: Vec<ScoringInput> = (0..1_000)
        .map(|i| ScoringInput {
            similarity: (i % 100) as f64,
            created_at: Some(now - Duration::hours(i)),
            updated_at: Some(now - Duration::hours(i)),
            access_count: (i % 17) as u64,
            interference_count: (i % 3) as u32,
            title: format!("memory {i}"),
            ..ScoringInput::default()
        })
        .collect();
    c.bench_function("score_1k", |b| {
        b.iter(|| inputs.iter().map(|i| scorer.score(i, Some("memory"), now)).sum::<f64>())
    });
}

criterion_group!(benches, bench_rrf_3x200, bench_rsf_3x200, bench_score_1k);
criterion_main!(benches);
