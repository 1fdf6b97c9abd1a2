//! Helpers shared by the graphloom-core integration suites.
#![allow(dead_code, reason = "each suite uses a different subset")]

use graphloom_core::{Graph, GraphError};
use graphloom_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use test_strategy::Arbitrary;

/// Upper bound (exclusive) for generated node indices.
pub const MAX_INDEX: usize = 12;

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: ProptestRunProfile::load(default_cases).cases(),
        ..ProptestConfig::default()
    }
}

/// One step of a random mutation script. Indices may exceed the node count,
/// exercising the rejection paths.
#[derive(Clone, Copy, Debug, Arbitrary)]
pub enum Mutation {
    #[weight(5)]
    AddEdge {
        #[strategy(0..MAX_INDEX)]
        source: usize,
        #[strategy(0..MAX_INDEX)]
        target: usize,
        #[strategy(1..=9_u8)]
        weight: u8,
    },
    #[weight(2)]
    UpdateEdge {
        #[strategy(0..MAX_INDEX)]
        source: usize,
        #[strategy(0..MAX_INDEX)]
        target: usize,
        #[strategy(1..=9_u8)]
        weight: u8,
    },
    #[weight(2)]
    RemoveEdge {
        #[strategy(0..MAX_INDEX)]
        source: usize,
        #[strategy(0..MAX_INDEX)]
        target: usize,
    },
    #[weight(1)]
    RemoveNode {
        #[strategy(0..MAX_INDEX)]
        index: usize,
    },
    #[weight(1)]
    RemoveNodes {
        #[strategy(0..MAX_INDEX)]
        first: usize,
        #[strategy(0..MAX_INDEX)]
        second: usize,
    },
    #[weight(1)]
    AddNodes {
        #[strategy(0..3_usize)]
        count: usize,
    },
}

impl Mutation {
    /// Applies the mutation, returning the graph's verdict.
    pub fn apply(self, graph: &mut Graph) -> Result<(), GraphError> {
        match self {
            Self::AddEdge {
                source,
                target,
                weight,
            } => graph.add_edge(source, target, f64::from(weight)).map(drop),
            Self::UpdateEdge {
                source,
                target,
                weight,
            } => graph.update_edge_weight(source, target, f64::from(weight)),
            Self::RemoveEdge { source, target } => graph.remove_edge(source, target).map(drop),
            Self::RemoveNode { index } => graph.remove_node(index),
            Self::RemoveNodes { first, second } => graph.remove_nodes(&[first, second]),
            Self::AddNodes { count } => {
                graph.add_nodes(count);
                Ok(())
            }
        }
    }
}

/// Generates a graph of up to [`MAX_INDEX`] nodes built by a mutation script.
pub fn mutated_graph() -> impl Strategy<Value = Graph> {
    (
        1..MAX_INDEX,
        any::<bool>(),
        prop::collection::vec(any::<Mutation>(), 0..48),
    )
        .prop_map(|(nodes, directed, script)| {
            let mut graph = Graph::new(nodes, directed);
            for mutation in script {
                let outcome = mutation.apply(&mut graph);
                drop(outcome);
            }
            graph
        })
}

/// Checks the storage invariants every graph must hold after any mutation.
pub fn check_invariants(graph: &Graph) -> Result<(), TestCaseError> {
    let mut degree_sum = 0;
    let mut self_loops = 0;
    for node in 0..graph.node_count() {
        let neighbours = graph
            .neighbours(node)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        prop_assert!(
            neighbours.windows(2).all(|pair| pair[0].node() < pair[1].node()),
            "adjacency of node {node} is not strictly ascending"
        );
        for entry in neighbours {
            prop_assert!(entry.node() < graph.node_count());
            if entry.node() == node {
                self_loops += 1;
            }
            if !graph.is_directed() {
                prop_assert_eq!(
                    graph.edge_weight(entry.node(), node),
                    Some(entry.weight()),
                    "edge ({}, {}) is not mirrored",
                    node,
                    entry.node()
                );
            }
        }
        degree_sum += neighbours.len();
    }
    if graph.is_directed() {
        prop_assert_eq!(graph.edge_count(), degree_sum);
    } else {
        // Undirected self-loops appear once in the degree sum.
        prop_assert_eq!(graph.edge_count() * 2, degree_sum + self_loops);
    }
    Ok(())
}
