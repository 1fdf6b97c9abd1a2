//! Mutable weighted graph with sorted adjacency lists.
//!
//! Nodes are dense positions `0..node_count`. Each node owns a list of
//! outgoing [`Neighbour`] entries kept strictly ascending by neighbour index.
//! Undirected graphs store every edge in both endpoint lists with the same
//! weight; self-loops are stored once.
//!
//! Removing a node renumbers every index above it, so indices held by a
//! caller are invalidated. [`Graph::remove_nodes`] handles that by removing
//! in descending order.

pub(crate) mod adjacency;

use tracing::warn;

use crate::error::{GraphError, Result};

/// Outgoing adjacency entry: the neighbouring node and the edge weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    node: usize,
    weight: f64,
}

impl Neighbour {
    pub(crate) const fn new(node: usize, weight: f64) -> Self {
        Self { node, weight }
    }

    /// Returns the neighbouring node index.
    #[must_use]
    #[rustfmt::skip]
    pub const fn node(&self) -> usize { self.node }

    /// Returns the weight of the edge leading to the neighbour.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }
}

/// A logical `(source, target, weight)` edge as yielded by [`Graph::edges`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
    weight: f64,
}

impl Edge {
    /// Creates an edge from `source` to `target` carrying `weight`.
    #[must_use]
    pub const fn new(source: usize, target: usize, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the origin node.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the destination node.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }
}

/// Outcome of inserting an edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeInsertion {
    /// A new edge was created and the edge count grew by one.
    Created,
    /// The pair was already connected; the weight was added to the existing
    /// edge and the edge count is unchanged.
    Merged,
}

/// Simple weighted graph, directed or undirected.
///
/// # Examples
/// ```
/// use graphloom_core::Graph;
///
/// let mut graph = Graph::new(3, false);
/// graph.add_edge(0, 2, 1.5).expect("nodes exist");
/// graph.add_edge(0, 1, 1.0).expect("nodes exist");
/// let order: Vec<usize> = graph
///     .neighbours(0)
///     .expect("node 0 exists")
///     .iter()
///     .map(|n| n.node())
///     .collect();
/// assert_eq!(order, vec![1, 2]);
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    directed: bool,
    edge_count: usize,
    adjacency: Vec<Vec<Neighbour>>,
}

impl Graph {
    /// Creates a graph with `node_count` isolated nodes and no edges.
    #[must_use]
    pub fn new(node_count: usize, directed: bool) -> Self {
        Self {
            directed,
            edge_count: 0,
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// Builds a graph from explicit `(source, target, weight)` triples.
    ///
    /// This is the construction contract used by file importers. Duplicate
    /// pairs accumulate their weights.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] for the first triple that references
    /// a node `>= node_count`.
    pub fn from_edges<I>(node_count: usize, directed: bool, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut graph = Self::new(node_count, directed);
        graph.add_edges(edges)?;
        Ok(graph)
    }

    /// Returns `true` when edges are one-way.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns the number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.adjacency.len() }

    /// Returns the number of logical edges; undirected edges count once.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_count(&self) -> usize { self.edge_count }

    /// Returns the sorted outgoing adjacency of `index`.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] when `index >= node_count`. Callers
    /// wanting the neutral empty list can use `unwrap_or_default()`.
    pub fn neighbours(&self, index: usize) -> Result<&[Neighbour]> {
        self.adjacency
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| self.rejected("neighbours", self.out_of_range(index)))
    }

    /// Returns the number of entries in `index`'s adjacency list (the
    /// out-degree for directed graphs).
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] when `index >= node_count`.
    pub fn degree(&self, index: usize) -> Result<usize> {
        self.neighbours(index).map(<[Neighbour]>::len)
    }

    /// Returns `true` when an edge `source -> target` is stored.
    ///
    /// Out-of-range indices simply report `false`.
    #[must_use]
    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.adjacency
            .get(source)
            .is_some_and(|list| adjacency::locate(list, target).is_ok())
    }

    /// Returns the weight of `source -> target` if the edge exists.
    #[must_use]
    pub fn edge_weight(&self, source: usize, target: usize) -> Option<f64> {
        let list = self.adjacency.get(source)?;
        let position = adjacency::locate(list, target).ok()?;
        list.get(position).map(Neighbour::weight)
    }

    /// Iterates the logical edges of the graph.
    ///
    /// Directed graphs yield every stored entry. Undirected graphs yield each
    /// edge once, from the endpoint with the smaller index (`target >=
    /// source`).
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let directed = self.directed;
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(move |(source, list)| {
                list.iter()
                    .filter(move |entry| directed || entry.node >= source)
                    .map(move |entry| Edge::new(source, entry.node, entry.weight))
            })
    }

    /// Appends a single isolated node and returns its index.
    pub fn add_node(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Appends `count` isolated nodes. A count of zero is a no-op.
    pub fn add_nodes(&mut self, count: usize) {
        let target_len = self.adjacency.len() + count;
        self.adjacency.resize_with(target_len, Vec::new);
    }

    /// Inserts an edge, accumulating the weight if the pair is already
    /// connected.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] if either endpoint is not a node;
    /// the graph is left unchanged.
    pub fn add_edge(&mut self, source: usize, target: usize, weight: f64) -> Result<EdgeInsertion> {
        self.ensure_pair("add_edge", source, target)?;
        let outcome = self.insert_unchecked(source, target, weight);
        Ok(outcome)
    }

    /// Inserts a batch of edges, stopping at the first out-of-range pair.
    ///
    /// Edges preceding the failing item remain applied; later items are not
    /// processed. Returns the number of newly created edges on success.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] for the first invalid edge.
    pub fn add_edges<I>(&mut self, edges: I) -> Result<usize>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut created = 0;
        for (source, target, weight) in edges {
            if self.add_edge(source, target, weight)? == EdgeInsertion::Created {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Replaces the weight of an existing edge (both directions when
    /// undirected).
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] for invalid endpoints or
    /// [`GraphError::EdgeNotFound`] when the edge does not exist. The graph is
    /// left unchanged in both cases.
    pub fn update_edge_weight(&mut self, source: usize, target: usize, weight: f64) -> Result<()> {
        self.ensure_pair("update_edge_weight", source, target)?;
        if !self.has_edge(source, target) {
            return Err(self.rejected(
                "update_edge_weight",
                GraphError::EdgeNotFound {
                    origin: source,
                    target,
                },
            ));
        }
        if let Some(list) = self.adjacency.get_mut(source) {
            adjacency::overwrite_weight(list, target, weight);
        }
        if !self.directed && source != target {
            if let Some(list) = self.adjacency.get_mut(target) {
                adjacency::overwrite_weight(list, source, weight);
            }
        }
        Ok(())
    }

    /// Replaces the weights of a batch of edges, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the first [`GraphError`] raised by [`Graph::update_edge_weight`].
    pub fn update_edge_weights<I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        for (source, target, weight) in edges {
            self.update_edge_weight(source, target, weight)?;
        }
        Ok(())
    }

    /// Removes an edge and returns its weight.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] for invalid endpoints or
    /// [`GraphError::EdgeNotFound`] when the edge does not exist.
    pub fn remove_edge(&mut self, source: usize, target: usize) -> Result<f64> {
        self.ensure_pair("remove_edge", source, target)?;
        let removed = self
            .adjacency
            .get_mut(source)
            .and_then(|list| adjacency::remove(list, target));
        let Some(entry) = removed else {
            return Err(self.rejected(
                "remove_edge",
                GraphError::EdgeNotFound {
                    origin: source,
                    target,
                },
            ));
        };
        if !self.directed && source != target {
            if let Some(list) = self.adjacency.get_mut(target) {
                adjacency::remove(list, source);
            }
        }
        self.edge_count -= 1;
        Ok(entry.weight)
    }

    /// Removes a batch of edges given as `(source, target)` pairs, stopping at
    /// the first failure.
    ///
    /// # Errors
    /// Returns the first [`GraphError`] raised by [`Graph::remove_edge`].
    pub fn remove_edges(&mut self, pairs: impl IntoIterator<Item = (usize, usize)>) -> Result<()> {
        for (source, target) in pairs {
            self.remove_edge(source, target)?;
        }
        Ok(())
    }

    /// Removes a node with all incident edges and renumbers every node above
    /// it down by one.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] when `index >= node_count`.
    pub fn remove_node(&mut self, index: usize) -> Result<()> {
        if index >= self.node_count() {
            return Err(self.rejected("remove_node", self.out_of_range(index)));
        }
        let own = self.adjacency.remove(index);
        // Undirected references elsewhere mirror entries in `own`, which are
        // already counted.
        let mut dropped = own.len();
        for list in &mut self.adjacency {
            if adjacency::detach_and_renumber(list, index) && self.directed {
                dropped += 1;
            }
        }
        self.edge_count -= dropped;
        Ok(())
    }

    /// Removes several nodes, processing them in descending index order so
    /// earlier removals cannot shift later ones. Duplicate indices are
    /// removed once.
    ///
    /// # Errors
    /// Returns [`GraphError::OutOfRange`] if any index is out of range, in
    /// which case no node is removed.
    pub fn remove_nodes(&mut self, indices: &[usize]) -> Result<()> {
        if let Some(&index) = indices.iter().find(|&&index| index >= self.node_count()) {
            return Err(self.rejected("remove_nodes", self.out_of_range(index)));
        }
        let mut ordered = indices.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered.dedup();
        for index in ordered {
            self.remove_node(index)?;
        }
        Ok(())
    }

    fn insert_unchecked(&mut self, source: usize, target: usize, weight: f64) -> EdgeInsertion {
        let Some(list) = self.adjacency.get_mut(source) else {
            return EdgeInsertion::Merged;
        };
        let outcome = adjacency::insert_or_accumulate(list, target, weight);
        if !self.directed && source != target {
            if let Some(list) = self.adjacency.get_mut(target) {
                adjacency::insert_or_accumulate(list, source, weight);
            }
        }
        if outcome == EdgeInsertion::Created {
            self.edge_count += 1;
        }
        outcome
    }

    fn ensure_pair(&self, operation: &'static str, source: usize, target: usize) -> Result<()> {
        for index in [source, target] {
            if index >= self.node_count() {
                return Err(self.rejected(operation, self.out_of_range(index)));
            }
        }
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> GraphError {
        GraphError::OutOfRange {
            index,
            node_count: self.node_count(),
        }
    }

    fn rejected(&self, operation: &'static str, error: GraphError) -> GraphError {
        warn!(
            operation,
            code = error.code().as_str(),
            node_count = self.node_count(),
            %error,
            "graph request rejected"
        );
        error
    }
}
