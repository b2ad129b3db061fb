//! Benchmarks for path enumeration.
//!
//! Measures:
//! - Ladder graphs, where the path count doubles with every rung
//! - Long chains, where a single path runs deep
//! - The cost of a `max_paths` cutoff against a full enumeration

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graphforms::prelude::*;
use graphforms::walk::{walk_all, walk_all_with};

/// `rungs` diamonds in a row: 2^rungs root-to-endpoint paths.
fn ladder(rungs: usize) -> Adjacency {
    let mut graph = Adjacency::new();
    for rung in 0..rungs {
        let hub = format!("hub{rung}");
        let next = format!("hub{}", rung + 1);
        for side in ["left", "right"] {
            let step = format!("{side}{rung}");
            graph.insert_edge(&Edge::new(hub.as_str(), step.as_str()).unwrap());
            graph.insert_edge(&Edge::new(step.as_str(), next.as_str()).unwrap());
        }
    }
    graph
}

fn chain(length: usize) -> Adjacency {
    let mut graph = Adjacency::new();
    for index in 1..length {
        let edge = Edge::new(format!("n{}", index - 1), format!("n{index}")).unwrap();
        graph.insert_edge(&edge);
    }
    graph
}

fn bench_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_ladder");
    for rungs in [4usize, 8, 12] {
        let graph = ladder(rungs);
        group.bench_with_input(BenchmarkId::from_parameter(rungs), &graph, |b, graph| {
            b.iter(|| walk_all(black_box(graph)));
        });
    }
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let graph = chain(10_000);
    c.bench_function("walk_chain_10k", |b| {
        b.iter(|| walk_all(black_box(&graph)));
    });
}

fn bench_limit(c: &mut Criterion) {
    let graph = ladder(12);
    let config = WalkConfig::unbounded().with_max_paths(64);
    c.bench_function("walk_ladder_12_limited", |b| {
        b.iter(|| {
            let _ = walk_all_with(black_box(&graph), &config);
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_ladder, bench_chain, bench_limit
);
criterion_main!(benches);
