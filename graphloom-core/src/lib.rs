//! Graphloom core library.
//!
//! Weighted directed and undirected graphs stored as sorted adjacency lists,
//! with traversal and shortest-path algorithms, structural and randomized
//! generators, and summary statistics. Randomized generators take their
//! random source as an argument.

pub mod algorithms;
mod error;
pub mod generators;
mod graph;
pub mod stats;

pub use crate::{
    algorithms::{
        DistanceMatrix, REACHABLE_THRESHOLD, UNREACHABLE, bfs_reachable, dfs_connected,
        floyd_warshall, reach_counts,
    },
    error::{GraphError, GraphErrorCode, Result},
    graph::{Edge, EdgeInsertion, Graph, Neighbour},
    stats::{DegreeDistribution, DistanceSummary, GraphSummary},
};
