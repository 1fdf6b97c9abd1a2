//! Benchmark parameter types.

use std::fmt;

/// Size of a generated benchmark graph.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of nodes.
    pub node_count: usize,
    /// Target degree of every node.
    pub average_degree: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.average_degree)
    }
}

#[cfg(test)]
mod tests {
    use super::GraphBenchParams;

    #[test]
    fn display_is_compact() {
        let params = GraphBenchParams {
            node_count: 100,
            average_degree: 4,
        };
        assert_eq!(params.to_string(), "n=100,k=4");
    }
}
