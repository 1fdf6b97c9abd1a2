//! All-pairs shortest paths by Floyd–Warshall relaxation.

use tracing::{instrument, warn};

use crate::{
    error::{GraphError, Result},
    graph::Graph,
};

/// Distance stored for pairs with no connecting path.
///
/// Far below half of `f64::MAX`, so adding two sentinels cannot overflow.
pub const UNREACHABLE: f64 = 1.0e150;

/// Distances above this value are treated as unreachable.
pub const REACHABLE_THRESHOLD: f64 = 1.0e100;

/// Dense `n × n` matrix of shortest-path distances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    fn seeded(size: usize) -> Self {
        Self {
            size,
            distances: vec![UNREACHABLE; size * size],
        }
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    #[rustfmt::skip]
    pub const fn size(&self) -> usize { self.size }

    /// Returns `true` for the matrix produced from an empty graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.size == 0 }

    /// Returns the distance from `source` to `target`, or `None` when either
    /// index is outside the matrix.
    #[must_use]
    pub fn get(&self, source: usize, target: usize) -> Option<f64> {
        if source >= self.size || target >= self.size {
            return None;
        }
        self.distances.get(source * self.size + target).copied()
    }

    /// Returns `true` when a finite path leads from `source` to `target`.
    #[must_use]
    pub fn is_reachable(&self, source: usize, target: usize) -> bool {
        self.get(source, target)
            .is_some_and(|distance| distance < REACHABLE_THRESHOLD)
    }

    /// Returns the distances from `source` to every node.
    #[must_use]
    pub fn row(&self, source: usize) -> Option<&[f64]> {
        if source >= self.size {
            return None;
        }
        let start = source * self.size;
        self.distances.get(start..start + self.size)
    }

    /// Iterates the rows in node order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.distances.chunks_exact(self.size.max(1))
    }

    fn set(&mut self, source: usize, target: usize, distance: f64) {
        if let Some(slot) = self.distances.get_mut(source * self.size + target) {
            *slot = distance;
        }
    }
}

/// Computes shortest-path distances between every ordered pair of nodes.
///
/// Direct edges seed the matrix with their weights, the diagonal is `0`, and
/// every other pair starts at [`UNREACHABLE`]. The relaxation iterates the
/// intermediate node outermost. Negative weights are not supported.
///
/// # Errors
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes. The neutral
/// result is an empty matrix.
///
/// # Examples
/// ```
/// use graphloom_core::{Graph, floyd_warshall};
///
/// let graph = Graph::from_edges(3, false, [(0, 1, 2.0), (1, 2, 3.0)]).expect("valid edges");
/// let matrix = floyd_warshall(&graph).expect("graph is not empty");
/// assert_eq!(matrix.get(0, 2), Some(5.0));
/// ```
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn floyd_warshall(graph: &Graph) -> Result<DistanceMatrix> {
    let size = graph.node_count();
    if size == 0 {
        warn!("cannot compute shortest paths for an empty graph");
        return Err(GraphError::EmptyGraph);
    }
    let mut matrix = DistanceMatrix::seeded(size);
    for source in 0..size {
        for entry in graph.neighbours(source)? {
            matrix.set(source, entry.node(), entry.weight());
        }
        matrix.set(source, source, 0.0);
    }

    let dist = &mut matrix.distances;
    for via in 0..size {
        for source in 0..size {
            let Some(&to_via) = dist.get(source * size + via) else {
                continue;
            };
            if to_via >= UNREACHABLE {
                continue;
            }
            for target in 0..size {
                let Some(&onward) = dist.get(via * size + target) else {
                    continue;
                };
                let candidate = to_via + onward;
                if let Some(current) = dist.get_mut(source * size + target) {
                    if candidate < *current {
                        *current = candidate;
                    }
                }
            }
        }
    }
    Ok(matrix)
}
