//! Benchmark support crate for graphloom.
//!
//! Provides parameter types and seeded graph fixtures shared by the Criterion
//! benchmarks for generators and all-pairs shortest paths.

pub mod error;
pub mod params;

use graphloom_core::{Graph, generators::erdos_renyi};
use rand::{SeedableRng, rngs::SmallRng};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// Builds the regular random graph used as shared input for algorithm
/// benchmarks, with every edge given one chance to be rewired.
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] when the parameters do not describe a
/// regular graph.
pub fn regular_random_graph(params: &GraphBenchParams, seed: u64) -> Result<Graph, BenchSetupError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let graph = erdos_renyi(params.node_count, params.average_degree, 1.0, true, &mut rng)?;
    Ok(graph)
}
