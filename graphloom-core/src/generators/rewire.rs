//! The shared rewiring primitive used by the randomized models.

use rand::{
    Rng,
    seq::{IteratorRandom, SliceRandom},
};
use tracing::{debug, instrument};

use super::structural::rejected;
use crate::{
    error::Result,
    graph::{Edge, Graph},
};

/// Uniform draws tried before falling back to enumerating every candidate.
const SAMPLE_ATTEMPTS: usize = 32;

/// Swap-chain steps allowed per node before a chain is abandoned.
const CHAIN_STEPS_PER_NODE: usize = 64;

/// Selects how [`reconnect`] perturbs a graph.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RewireMode {
    /// Adds each unordered pair independently with probability `rate`.
    Independent,
    /// Moves edges through closed swap chains so every degree is unchanged.
    DegreePreserving,
    /// Moves one endpoint of each selected edge to a random non-neighbour.
    Simple,
}

/// Perturbs `graph` in place according to `mode`.
///
/// Edge-moving modes visit a snapshot of the edges present on entry, each
/// undirected edge once from its larger endpoint. An edge already displaced
/// by an earlier move is skipped. Moved edges keep their weight, and an edge
/// with no eligible new endpoint is left where it is.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`](crate::GraphError::InvalidParameter)
/// when `rate` lies outside `[0, 1]` or when
/// [`RewireMode::DegreePreserving`] is requested on a directed graph.
#[instrument(level = "debug", skip(graph, rng), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn reconnect<R>(graph: &mut Graph, rate: f64, mode: RewireMode, rng: &mut R) -> Result<()>
where
    R: Rng + ?Sized,
{
    if !(0.0..=1.0).contains(&rate) {
        return Err(rejected(format!("rewiring rate must lie in [0, 1], got {rate}")));
    }
    match mode {
        RewireMode::Independent => connect_pairs(graph, rate, rng),
        RewireMode::Simple => rewire_endpoints(graph, rate, rng),
        RewireMode::DegreePreserving => {
            if graph.is_directed() {
                return Err(rejected(
                    "degree-preserving rewiring requires an undirected graph".to_owned(),
                ));
            }
            swap_edges(graph, rate, rng)
        }
    }
}

fn connect_pairs<R: Rng + ?Sized>(graph: &mut Graph, rate: f64, rng: &mut R) -> Result<()> {
    for node in 0..graph.node_count() {
        for other in 0..node {
            if rng.gen_bool(rate) {
                graph.add_edge(node, other, 1.0)?;
            }
        }
    }
    Ok(())
}

fn rewire_endpoints<R: Rng + ?Sized>(graph: &mut Graph, rate: f64, rng: &mut R) -> Result<()> {
    for (node, neighbour) in snapshot(graph) {
        if !rng.gen_bool(rate) {
            continue;
        }
        let Some(weight) = graph.edge_weight(node, neighbour) else {
            continue;
        };
        graph.remove_edge(node, neighbour)?;
        let target = pick_non_neighbour(graph, node, rng).unwrap_or(neighbour);
        graph.add_edge(node, target, weight)?;
    }
    Ok(())
}

fn swap_edges<R: Rng + ?Sized>(graph: &mut Graph, rate: f64, rng: &mut R) -> Result<()> {
    let step_limit = CHAIN_STEPS_PER_NODE
        .saturating_mul(graph.node_count())
        .saturating_add(CHAIN_STEPS_PER_NODE);
    let mut abandoned = 0_usize;
    for (node, evicted) in snapshot(graph) {
        if !rng.gen_bool(rate) || !graph.has_edge(node, evicted) {
            continue;
        }
        let mut journal = SwapJournal::default();
        let closed = run_chain(graph, node, evicted, step_limit, &mut journal, rng);
        match closed {
            Ok(true) => {}
            Ok(false) => {
                abandoned += 1;
                journal.rollback(graph)?;
            }
            Err(error) => {
                journal.rollback(graph)?;
                return Err(error);
            }
        }
    }
    if abandoned > 0 {
        debug!(abandoned, "swap chains rolled back");
    }
    Ok(())
}

/// Moves `(node, evicted)` and repairs the displaced degree one swap at a
/// time. Returns `Ok(false)` when the chain cannot close.
fn run_chain<R: Rng + ?Sized>(
    graph: &mut Graph,
    node: usize,
    evicted: usize,
    step_limit: usize,
    journal: &mut SwapJournal,
    rng: &mut R,
) -> Result<bool> {
    let weight = journal.remove(graph, node, evicted)?;
    let Some(first) = pick_non_neighbour(graph, node, rng) else {
        return Ok(false);
    };
    journal.add(graph, node, first, weight)?;

    // `surplus` holds one edge too many until the chain reaches `evicted`,
    // which is the only node still short of one.
    let mut surplus = first;
    for _ in 0..step_limit {
        if surplus == evicted {
            return Ok(true);
        }
        // A self-loop partner would leave two surplus endpoints behind.
        let Some(partner) = graph
            .neighbours(surplus)?
            .iter()
            .map(|entry| entry.node())
            .filter(|&partner| partner != surplus)
            .choose(rng)
        else {
            return Ok(false);
        };
        let weight = journal.remove(graph, surplus, partner)?;
        let Some(target) = pick_non_neighbour(graph, partner, rng) else {
            return Ok(false);
        };
        journal.add(graph, partner, target, weight)?;
        surplus = target;
    }
    debug!(node, evicted, step_limit, "swap chain exceeded its step limit");
    Ok(surplus == evicted)
}

/// Edges present on entry, as `(larger endpoint, smaller endpoint)` for
/// undirected graphs and every stored non-loop entry for directed ones.
fn snapshot(graph: &Graph) -> Vec<(usize, usize)> {
    let directed = graph.is_directed();
    let mut pairs = Vec::with_capacity(graph.edge_count());
    for node in 0..graph.node_count() {
        for entry in graph.neighbours(node).unwrap_or_default() {
            let other = entry.node();
            if other < node || (directed && other != node) {
                pairs.push((node, other));
            }
        }
    }
    pairs
}

/// Draws a node that is neither `node` nor already one of its neighbours.
fn pick_non_neighbour<R: Rng + ?Sized>(
    graph: &Graph,
    node: usize,
    rng: &mut R,
) -> Option<usize> {
    let node_count = graph.node_count();
    if node_count < 2 {
        return None;
    }
    let eligible = |candidate: usize| candidate != node && !graph.has_edge(node, candidate);
    for _ in 0..SAMPLE_ATTEMPTS {
        let candidate = rng.gen_range(0..node_count);
        if eligible(candidate) {
            return Some(candidate);
        }
    }
    let candidates: Vec<usize> = (0..node_count).filter(|&candidate| eligible(candidate)).collect();
    candidates.choose(rng).copied()
}

#[derive(Debug)]
enum SwapStep {
    Removed(Edge),
    Added(Edge),
}

/// Records every mutation of a swap chain so it can be undone exactly.
#[derive(Debug, Default)]
struct SwapJournal {
    steps: Vec<SwapStep>,
}

impl SwapJournal {
    fn remove(&mut self, graph: &mut Graph, source: usize, target: usize) -> Result<f64> {
        let weight = graph.remove_edge(source, target)?;
        self.steps.push(SwapStep::Removed(Edge::new(source, target, weight)));
        Ok(weight)
    }

    fn add(&mut self, graph: &mut Graph, source: usize, target: usize, weight: f64) -> Result<()> {
        graph.add_edge(source, target, weight)?;
        self.steps.push(SwapStep::Added(Edge::new(source, target, weight)));
        Ok(())
    }

    fn rollback(self, graph: &mut Graph) -> Result<()> {
        for step in self.steps.into_iter().rev() {
            match step {
                SwapStep::Added(edge) => {
                    graph.remove_edge(edge.source(), edge.target())?;
                }
                SwapStep::Removed(edge) => {
                    graph.add_edge(edge.source(), edge.target(), edge.weight())?;
                }
            }
        }
        Ok(())
    }
}
