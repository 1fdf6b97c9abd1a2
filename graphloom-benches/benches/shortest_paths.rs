//! All-pairs shortest path and statistics benchmarks.
//!
//! Floyd–Warshall is cubic in the node count, so sizes stay small. The
//! summary benchmark adds clustering and degree statistics on top of the
//! distance matrix.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use graphloom_benches::{error::BenchSetupError, params::GraphBenchParams, regular_random_graph};
use graphloom_core::{floyd_warshall, stats::summarize};

const SEED: u64 = 42;

const NODE_COUNTS: &[usize] = &[50, 100, 200];

const AVERAGE_DEGREE: usize = 6;

fn all_pairs_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("all_pairs");
    group.sample_size(10);

    for &node_count in NODE_COUNTS {
        let params = GraphBenchParams {
            node_count,
            average_degree: AVERAGE_DEGREE,
        };
        let graph = regular_random_graph(&params, SEED)?;
        group.bench_with_input(BenchmarkId::new("floyd_warshall", &params), &graph, |b, graph| {
            b.iter(|| floyd_warshall(graph));
        });
        group.bench_with_input(BenchmarkId::new("summarize", &params), &graph, |b, graph| {
            b.iter(|| summarize(graph));
        });
    }

    group.finish();
    Ok(())
}

fn all_pairs(c: &mut Criterion) {
    if let Err(err) = all_pairs_impl(c) {
        panic!("all_pairs benchmark setup failed: {err}");
    }
}

criterion_group!(benches, all_pairs);
criterion_main!(benches);
