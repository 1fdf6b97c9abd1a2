//! Read-only graph algorithms: connectivity, reachability, and all-pairs
//! shortest paths.
//!
//! Every function borrows the [`Graph`](crate::Graph) immutably.

mod shortest_paths;
mod traversal;

pub use self::{
    shortest_paths::{DistanceMatrix, REACHABLE_THRESHOLD, UNREACHABLE, floyd_warshall},
    traversal::{bfs_reachable, dfs_connected, reach_counts},
};
