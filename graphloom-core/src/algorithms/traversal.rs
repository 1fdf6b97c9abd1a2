//! Connectivity and reachability traversals.

use std::collections::VecDeque;

use tracing::{instrument, warn};

use crate::{
    error::{GraphError, Result},
    graph::Graph,
};

/// Returns `true` when every node is reachable from node `0` following
/// stored adjacency (outgoing edges for directed graphs).
///
/// Traversal is depth-first with an explicit stack, visiting neighbours in
/// ascending index order.
///
/// # Errors
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes. The neutral
/// result is `false`.
///
/// # Examples
/// ```
/// use graphloom_core::{Graph, dfs_connected};
///
/// let graph = Graph::from_edges(3, false, [(0, 1, 1.0), (1, 2, 1.0)]).expect("valid edges");
/// assert_eq!(dfs_connected(&graph), Ok(true));
/// ```
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn dfs_connected(graph: &Graph) -> Result<bool> {
    let node_count = graph.node_count();
    if node_count == 0 {
        warn!("cannot check connectivity of an empty graph");
        return Err(GraphError::EmptyGraph);
    }
    let mut visited = vec![false; node_count];
    let mut stack = vec![0_usize];
    while let Some(node) = stack.pop() {
        let Some(seen) = visited.get_mut(node) else {
            continue;
        };
        if *seen {
            continue;
        }
        *seen = true;
        // Pushed in reverse so the smallest neighbour is expanded first.
        for entry in graph.neighbours(node)?.iter().rev() {
            if !visited.get(entry.node()).copied().unwrap_or(true) {
                stack.push(entry.node());
            }
        }
    }
    Ok(visited.into_iter().all(|seen| seen))
}

/// Returns `true` when `end` can be reached from `start`.
///
/// Breadth-first search that stops as soon as an unvisited `end` is seen in
/// the adjacency of a dequeued node, so `end` itself is never dequeued.
/// `start` is visited before the search begins, so a node never reaches
/// itself.
///
/// # Errors
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes and
/// [`GraphError::OutOfRange`] when either endpoint is not a node. The neutral
/// result is `false`.
pub fn bfs_reachable(graph: &Graph, start: usize, end: usize) -> Result<bool> {
    let node_count = graph.node_count();
    if node_count == 0 {
        warn!("cannot search an empty graph");
        return Err(GraphError::EmptyGraph);
    }
    for index in [start, end] {
        if index >= node_count {
            warn!(index, node_count, "search endpoint is not in the graph");
            return Err(GraphError::OutOfRange { index, node_count });
        }
    }
    let mut visited = vec![false; node_count];
    if let Some(seen) = visited.get_mut(start) {
        *seen = true;
    }
    let mut frontier = VecDeque::from([start]);
    while let Some(node) = frontier.pop_front() {
        for entry in graph.neighbours(node)? {
            let next = entry.node();
            let Some(seen) = visited.get_mut(next) else {
                continue;
            };
            if *seen {
                continue;
            }
            if next == end {
                return Ok(true);
            }
            *seen = true;
            frontier.push_back(next);
        }
    }
    Ok(false)
}

/// Counts, for every node, how many *other* nodes it can reach.
///
/// This backs the `reachNodeCount` column of node reports. An empty graph
/// yields an empty vector.
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn reach_counts(graph: &Graph) -> Vec<usize> {
    let node_count = graph.node_count();
    let mut counts = vec![0; node_count];
    for (start, count) in counts.iter_mut().enumerate() {
        let mut visited = vec![false; node_count];
        if let Some(seen) = visited.get_mut(start) {
            *seen = true;
        }
        let mut frontier = VecDeque::from([start]);
        while let Some(node) = frontier.pop_front() {
            for entry in graph.neighbours(node).unwrap_or_default() {
                if let Some(seen) = visited.get_mut(entry.node()) {
                    if !*seen {
                        *seen = true;
                        *count += 1;
                        frontier.push_back(entry.node());
                    }
                }
            }
        }
    }
    counts
}
