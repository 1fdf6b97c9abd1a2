//! Aggregate graph statistics: degree distribution, clustering, and
//! shortest-path distance summaries.


use tracing::{info, instrument, warn};

use crate::{
    algorithms::{DistanceMatrix, REACHABLE_THRESHOLD, floyd_warshall},
    error::{GraphError, Result},
    graph::{Graph, adjacency::intersection_count},
};

/// Mean, variance, and relative frequency of node degrees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DegreeDistribution {
    mean: f64,
    variance: f64,
    histogram: Vec<f64>,
}

impl DegreeDistribution {
    /// Mean degree across all nodes.
    #[must_use]
    #[rustfmt::skip]
    pub const fn mean(&self) -> f64 { self.mean }

    /// Population variance of the degree, `E[d²] − E[d]²`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn variance(&self) -> f64 { self.variance }

    /// Fraction of nodes with each degree, indexed by degree.
    ///
    /// The histogram has one entry per node, extended only if a node's degree
    /// reaches the node count (possible with self-loops).
    #[must_use]
    pub fn histogram(&self) -> &[f64] {
        &self.histogram
    }
}

/// Minimum, mean, and maximum over finite off-diagonal distances.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceSummary {
    min: f64,
    mean: f64,
    max: f64,
}

impl DistanceSummary {
    /// Shortest finite distance between two distinct nodes.
    #[must_use]
    #[rustfmt::skip]
    pub const fn min(&self) -> f64 { self.min }

    /// Mean finite distance between two distinct nodes.
    #[must_use]
    #[rustfmt::skip]
    pub const fn mean(&self) -> f64 { self.mean }

    /// Longest finite distance between two distinct nodes.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max(&self) -> f64 { self.max }

    /// Summarizes an existing distance matrix.
    ///
    /// Returns `(0, 0, 0)` when no pair of distinct nodes is connected.
    #[must_use]
    pub fn from_matrix(matrix: &DistanceMatrix) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0_u32;
        for (source, row) in matrix.rows().enumerate() {
            for (target, &distance) in row.iter().enumerate() {
                if source == target || distance > REACHABLE_THRESHOLD {
                    continue;
                }
                min = min.min(distance);
                max = max.max(distance);
                sum += distance;
                count += 1;
            }
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            min,
            mean: sum / f64::from(count),
            max,
        }
    }
}

/// One row of a multi-graph summary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphSummary {
    directed: bool,
    node_count: usize,
    edge_count: usize,
    degree_mean: f64,
    degree_variance: f64,
    clustering: f64,
    distances: DistanceSummary,
}

impl GraphSummary {
    /// Whether the summarized graph is directed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Node count of the summarized graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn node_count(&self) -> usize { self.node_count }

    /// Edge count of the summarized graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_count(&self) -> usize { self.edge_count }

    /// Mean degree.
    #[must_use]
    #[rustfmt::skip]
    pub const fn degree_mean(&self) -> f64 { self.degree_mean }

    /// Degree variance.
    #[must_use]
    #[rustfmt::skip]
    pub const fn degree_variance(&self) -> f64 { self.degree_variance }

    /// Clustering coefficient, `0` for directed graphs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn clustering(&self) -> f64 { self.clustering }

    /// Finite distance extremes and mean.
    #[must_use]
    #[rustfmt::skip]
    pub const fn distances(&self) -> DistanceSummary { self.distances }
}

/// Computes the degree distribution. Directed graphs report out-degree.
///
/// # Examples
/// ```
/// use graphloom_core::{generators::ring, stats::degree_distribution};
///
/// let graph = ring(6, 2).expect("parameters are valid");
/// let distribution = degree_distribution(&graph);
/// assert_eq!(distribution.mean(), 2.0);
/// assert_eq!(distribution.variance(), 0.0);
/// assert_eq!(distribution.histogram()[2], 1.0);
/// ```
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn degree_distribution(graph: &Graph) -> DegreeDistribution {
    let node_count = graph.node_count();
    if node_count == 0 {
        return DegreeDistribution::default();
    }
    if graph.is_directed() {
        info!("degree distribution counts out-degree only; in-degree is not reported");
    }
    let mut counts = vec![0_u32; node_count];
    let mut sum = 0.0;
    let mut sum_squares = 0.0;
    for node in 0..node_count {
        let degree = graph.degree(node).unwrap_or_default();
        if degree >= counts.len() {
            counts.resize(degree + 1, 0);
        }
        if let Some(count) = counts.get_mut(degree) {
            *count += 1;
        }
        let value = as_f64(degree);
        sum += value;
        sum_squares += value * value;
    }
    let total = as_f64(node_count);
    let mean = sum / total;
    DegreeDistribution {
        mean,
        variance: sum_squares / total - mean * mean,
        histogram: counts
            .into_iter()
            .map(|count| f64::from(count) / total)
            .collect(),
    }
}

/// Computes the mean local clustering coefficient over all nodes.
///
/// A node's local coefficient is the fraction of its neighbour pairs that are
/// themselves adjacent; nodes with fewer than two neighbours contribute `0`.
/// Self-loops are ignored. The total is divided by the node count.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] for directed graphs. The neutral
/// result is `0`.
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn clustering_coefficient(graph: &Graph) -> Result<f64> {
    if graph.is_directed() {
        warn!("clustering coefficient is undefined for directed graphs");
        return Err(GraphError::invalid(
            "clustering coefficient requires an undirected graph",
        ));
    }
    let node_count = graph.node_count();
    if node_count == 0 {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for node in 0..node_count {
        let neighbours = graph.neighbours(node)?;
        let degree = neighbours.iter().filter(|entry| entry.node() != node).count();
        if degree < 2 {
            continue;
        }
        let mut shared = 0;
        for entry in neighbours.iter().filter(|entry| entry.node() != node) {
            let other = graph.neighbours(entry.node())?;
            shared += intersection_count(neighbours, other, node, entry.node());
        }
        // Each closed pair is seen once from either end.
        let closed = as_f64(shared) / 2.0;
        let degree = as_f64(degree);
        total += 2.0 * closed / (degree * (degree - 1.0));
    }
    Ok(total / as_f64(node_count))
}

/// Computes `(min, mean, max)` over finite shortest-path distances between
/// distinct nodes, ignoring unreachable pairs.
///
/// # Errors
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes. The neutral
/// result is `(0, 0, 0)`, which is also returned when no pair is connected.
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn distance_summary(graph: &Graph) -> Result<DistanceSummary> {
    let matrix = floyd_warshall(graph)?;
    Ok(DistanceSummary::from_matrix(&matrix))
}

/// Collects the statistics reported for one graph in a summary table.
///
/// Clustering is reported as `0` for directed graphs and distances as
/// `(0, 0, 0)` for graphs without nodes.
#[instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn summarize(graph: &Graph) -> GraphSummary {
    let degrees = degree_distribution(graph);
    let clustering = if graph.is_directed() {
        0.0
    } else {
        clustering_coefficient(graph).unwrap_or_default()
    };
    let distances = if graph.node_count() == 0 {
        DistanceSummary::default()
    } else {
        distance_summary(graph).unwrap_or_default()
    };
    GraphSummary {
        directed: graph.is_directed(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        degree_mean: degrees.mean(),
        degree_variance: degrees.variance(),
        clustering,
        distances,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "node counts and degrees stay far below 2^52"
)]
fn as_f64(value: usize) -> f64 {
    value as f64
}
