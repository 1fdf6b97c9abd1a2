//! Deterministic structural generators: complete, lattice, ring, and
//! odd-regular graphs. Every edge carries unit weight.

use tracing::{instrument, warn};

use crate::{
    error::{GraphError, Result},
    graph::Graph,
};

/// Default dimensionality for [`lattice`].
pub const DEFAULT_LATTICE_DIM: u32 = 2;
/// Default per-node degree for [`ring`].
pub const DEFAULT_RING_DEGREE: usize = 4;
/// Default per-node degree for [`odd_regular`].
pub const DEFAULT_ODD_DEGREE: usize = 3;

/// Builds the complete undirected graph on `node_count` nodes.
///
/// # Examples
/// ```
/// use graphloom_core::generators::full_connect;
///
/// let graph = full_connect(4);
/// assert_eq!(graph.edge_count(), 6);
/// ```
#[must_use]
#[instrument(level = "debug")]
pub fn full_connect(node_count: usize) -> Graph {
    let mut graph = Graph::new(node_count, false);
    for node in 0..node_count {
        for other in 0..node {
            link(&mut graph, node, other);
        }
    }
    graph
}

/// Builds a `dim`-dimensional periodic grid with `size` nodes per side.
///
/// Node `i` has coordinate `(i / size^j) % size` along axis `j` and links to
/// its successor on every axis, wrapping from `size - 1` back to `0`. With
/// `size >= 3` every node therefore has degree `2 * dim`. Smaller sides
/// produce merged edges (`size == 2`) or self-loops (`size == 1`).
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when `size^dim` overflows.
#[instrument(level = "debug")]
pub fn lattice(size: usize, dim: u32) -> Result<Graph> {
    let node_count = size.checked_pow(dim).ok_or_else(|| {
        rejected(format!("lattice with side {size} and dimension {dim} is too large"))
    })?;
    let mut graph = Graph::new(node_count, false);
    for node in 0..node_count {
        let mut stride = 1_usize;
        for _ in 0..dim {
            let coordinate = (node / stride) % size;
            let neighbour = if coordinate == size - 1 {
                node - (size - 1) * stride
            } else {
                node + stride
            };
            link(&mut graph, node, neighbour);
            stride *= size;
        }
    }
    Ok(graph)
}

/// Builds a circulant ring: every node links to its `degree / 2` nearest
/// successors, giving each node exactly `degree` neighbours.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] when `degree` is odd or not
/// smaller than `node_count`.
///
/// # Examples
/// ```
/// use graphloom_core::generators::ring;
///
/// let graph = ring(6, 4).expect("parameters are valid");
/// assert_eq!(graph.edge_count(), 12);
/// ```
#[instrument(level = "debug")]
pub fn ring(node_count: usize, degree: usize) -> Result<Graph> {
    if degree % 2 == 1 {
        return Err(rejected(format!(
            "ring nodes must have an even number of neighbours, got {degree}"
        )));
    }
    if degree >= node_count {
        return Err(rejected(format!(
            "cannot give each of {node_count} node(s) {degree} neighbour(s)"
        )));
    }
    if degree == 0 {
        warn!(node_count, "ring degree is zero; every node will be isolated");
    }
    let mut graph = Graph::new(node_count, false);
    for node in 0..node_count {
        for offset in 1..=degree / 2 {
            link(&mut graph, node, (node + offset) % node_count);
        }
    }
    Ok(graph)
}

/// Builds a regular graph of odd degree: a ring of degree `degree - 1` plus a
/// perfect matching that joins each node to its diametrically opposite node.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] unless `degree` is odd and at
/// least 3, `degree < node_count`, and `node_count` is even.
#[instrument(level = "debug")]
pub fn odd_regular(node_count: usize, degree: usize) -> Result<Graph> {
    if degree < 3 || degree % 2 == 0 {
        return Err(rejected(format!(
            "odd-regular degree must be an odd number of at least 3, got {degree}"
        )));
    }
    if degree >= node_count {
        return Err(rejected(format!(
            "cannot give each of {node_count} node(s) {degree} neighbour(s)"
        )));
    }
    if node_count % 2 == 1 {
        return Err(rejected(format!(
            "odd-regular graphs need an even node count, got {node_count}"
        )));
    }
    let mut graph = ring(node_count, degree - 1)?;
    let half = node_count / 2;
    for node in 0..half {
        link(&mut graph, node, node + half);
    }
    Ok(graph)
}

/// Adds a unit edge between nodes the caller has already bounded.
pub(super) fn link(graph: &mut Graph, source: usize, target: usize) {
    if let Err(error) = graph.add_edge(source, target, 1.0) {
        warn!(%error, source, target, "generator produced an out-of-range edge");
    }
}

pub(super) fn rejected(reason: String) -> GraphError {
    warn!(%reason, "generator parameters rejected");
    GraphError::invalid(reason)
}
