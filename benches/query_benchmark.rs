//! Benchmarks for k2pac parsing and classification.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Classification throughput (hosts per second)
//! - Scalability with different rule set sizes
//! - Feed aggregation throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use k2pac::{MatchIndex, RuleSet};

/// Generate a filter list with the specified counts.
fn generate_feed(exact_count: usize, suffix_count: usize, keyword_count: usize) -> String {
    let mut feed = String::from("[AutoProxy 0.2.9]\n! generated\n");

    for i in 0..exact_count {
        feed.push_str(&format!("|https://domain{}.example.com/path\n", i));
    }

    for i in 0..suffix_count {
        feed.push_str(&format!("||suffix{}.com^\n", i));
        if i % 10 == 0 {
            feed.push_str(&format!("@@||white.suffix{}.com\n", i));
        }
    }

    for i in 0..keyword_count {
        feed.push_str(&format!("kw{}x\n", i));
    }

    feed
}

/// Generate test queries - mix of hits and misses.
fn generate_queries(count: usize, hit_ratio: f64) -> Vec<String> {
    let mut queries = Vec::with_capacity(count);
    let hits = (count as f64 * hit_ratio) as usize;

    // Queries that will hit
    for i in 0..hits {
        if i % 2 == 0 {
            queries.push(format!("domain{}.example.com", i % 1000));
        } else {
            queries.push(format!("a.b.sub.suffix{}.com", i % 1000));
        }
    }

    // Queries that will miss
    for i in hits..count {
        queries.push(format!("unknown{}.nonexistent.org", i));
    }

    queries
}

/// Benchmark classification throughput.
fn bench_classify(c: &mut Criterion) {
    let rules = RuleSet::from_sources(&generate_feed(10_000, 5_000, 50), None);
    let index = MatchIndex::build(&rules);
    let queries = generate_queries(1000, 0.8);

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("mixed_queries", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(index.classify(query));
            }
        })
    });

    group.bench_function("local_hosts", |b| {
        b.iter(|| {
            black_box(index.classify("192.168.1.1"));
            black_box(index.classify("localhost"));
        })
    });

    group.finish();
}

/// Benchmark scalability with different rule set sizes.
fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");

    for size in [100, 1_000, 10_000, 50_000].iter() {
        let rules = RuleSet::from_sources(&generate_feed(*size, size / 2, 20), None);
        let index = MatchIndex::build(&rules);

        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::new("rules", size), size, |b, _| {
            let queries: Vec<_> = (0..100)
                .map(|i| format!("x.y.suffix{}.com", i % (size / 2)))
                .collect();
            b.iter(|| {
                for query in &queries {
                    black_box(index.classify(query));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark parsing and aggregation of a feed.
fn bench_aggregate(c: &mut Criterion) {
    let feed = generate_feed(5_000, 5_000, 100);
    let lines = feed.lines().count();

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(lines as u64));

    group.bench_function("parse_and_build", |b| {
        b.iter(|| {
            let rules = RuleSet::from_sources(black_box(&feed), None);
            black_box(MatchIndex::build(&rules))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_classify, bench_scalability, bench_aggregate);
criterion_main!(benches);
