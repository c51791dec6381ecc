use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};

use recall_core::memory::{MemoryRecord, MemoryType};
use recall_decay::TierClassifier;

fn make_records(n: usize) -> Vec<MemoryRecord> {
    let now = Utc::now();
    (0..n)
        .map(|i| {
            let mut r = MemoryRecord::new("bench", "t", "c", now - Duration::days(i as i64 % 400));
            r.id = i as i64;
            r.memory_type = MemoryType::ALL.get(i % MemoryType::ALL.len()).copied();
            r
        })
        .collect()
}

fn bench_classify_1k(c: &mut Criterion) {
    let classifier = TierClassifier::default();
    let records = make_records(1_000);
    let now = Utc::now();
    c.bench_function("classify_1k", |b| {
        b.iter(|| {
            records
                .iter()
                .map(|r| classifier.classify(r, now).retrievability)
                .sum::<f64>()
        })
    });
}

fn bench_filter_and_limit_1k(c: &mut Criterion) {
    let classifier = TierClassifier::default();
    let records = make_records(1_000);
    let now = Utc::now();
    c.bench_function("filter_and_limit_1k", |b| {
        b.iter(|| classifier.filter_and_limit_by_state(&records, None, 20, now).len())
    });
}

criterion_group!(benches, bench_classify_1k, bench_filter_and_limit_1k);
criterion_main!(benches);
