//! Signature matching benchmarks.
//!
//! Mirrors the classic workload: 10k generated signatures matched against a
//! short input, over the whole registry and scoped by tags.

mod common;

use common::{create_engine, generate_signatures, BenchmarkConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sigolyze::{EngineConfig, Registry};

const DATA: &str = "Value1 Value2 Value3 Value12";

fn bench_load(c: &mut Criterion) {
    let config = BenchmarkConfig::default().with_signature_count(1_000);
    let sources = generate_signatures(&config);

    c.bench_function("load_1000_signatures", |b| {
        b.iter(|| {
            let mut registry = Registry::new();
            for source in &sources {
                registry.load_str(black_box(source)).unwrap();
            }
            registry
        })
    });
}

fn bench_match_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_all");

    for count in [100, 1_000, 10_000] {
        let config = BenchmarkConfig::default().with_signature_count(count);
        let sequential = create_engine(&config, EngineConfig::default()).unwrap();
        let parallel = create_engine(&config, EngineConfig::high_performance()).unwrap();

        group.bench_with_input(BenchmarkId::new("sequential", count), &count, |b, _| {
            b.iter(|| sequential.match_all(black_box(DATA)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, _| {
            b.iter(|| parallel.match_all(black_box(DATA)))
        });
    }

    group.finish();
}

fn bench_match_by_tags(c: &mut Criterion) {
    let config = BenchmarkConfig::default();
    let engine = create_engine(&config, EngineConfig::default()).unwrap();
    let tags = ["tag1_0", "tag2_0"];

    c.bench_function("match_by_tags_10000", |b| {
        b.iter(|| engine.match_by_tags(black_box(DATA), &tags))
    });
}

fn bench_mixed_regex(c: &mut Criterion) {
    let config = BenchmarkConfig::default()
        .with_signature_count(1_000)
        .with_regex_every(10);
    let engine = create_engine(&config, EngineConfig::default()).unwrap();
    let data = "test500_0 rx100_42 unrelated text";

    c.bench_function("match_all_mixed_regex_1000", |b| {
        b.iter(|| engine.match_all(black_box(data)))
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_match_all,
    bench_match_by_tags,
    bench_mixed_regex
);
criterion_main!(benches);
