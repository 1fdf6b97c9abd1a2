//! Randomized network models built on the structural generators and the
//! rewiring primitive.

use rand::Rng;
use tracing::{info, instrument};

use super::{
    rewire::{RewireMode, reconnect},
    structural::{full_connect, odd_regular, rejected, ring},
};
use crate::{error::Result, graph::Graph};

/// Builds an Erdős–Rényi style random graph.
///
/// With `regular` set, a ring (even `average_degree`) or odd-regular base is
/// built and then randomized by degree-preserving rewiring at
/// `connect_rate`, so every node keeps degree `average_degree`. Otherwise each
/// unordered pair of `node_count` isolated nodes is joined independently with
/// probability `connect_rate` and `average_degree` is ignored.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`](crate::GraphError::InvalidParameter)
/// when `connect_rate` lies outside `[0, 1]` or when the regular base cannot
/// be built for `node_count` and `average_degree`.
///
/// # Examples
/// ```
/// use graphloom_core::generators::erdos_renyi;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let graph = erdos_renyi(20, 4, 0.5, true, &mut rng).expect("parameters are valid");
/// assert!((0..20).all(|node| graph.degree(node) == Ok(4)));
/// ```
#[instrument(level = "debug", skip(rng))]
pub fn erdos_renyi<R>(
    node_count: usize,
    average_degree: usize,
    connect_rate: f64,
    regular: bool,
    rng: &mut R,
) -> Result<Graph>
where
    R: Rng + ?Sized,
{
    if regular {
        let mut graph = if average_degree % 2 == 0 {
            ring(node_count, average_degree)?
        } else {
            odd_regular(node_count, average_degree)?
        };
        reconnect(&mut graph, connect_rate, RewireMode::DegreePreserving, rng)?;
        return Ok(graph);
    }
    if average_degree != 0 {
        info!(average_degree, "average degree is ignored for G(n, p) graphs");
    }
    let mut graph = Graph::new(node_count, false);
    reconnect(&mut graph, connect_rate, RewireMode::Independent, rng)?;
    Ok(graph)
}

/// Applies the Watts–Strogatz small-world transform to `graph` in place.
///
/// Each existing edge is, with probability `reconnect_rate`, detached from its
/// smaller endpoint and reattached to a random node not yet adjacent to the
/// larger one. Degrees are not preserved.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`](crate::GraphError::InvalidParameter)
/// when `reconnect_rate` lies outside `[0, 1]`.
#[instrument(level = "debug", skip(graph, rng), fields(nodes = graph.node_count()))]
pub fn watts_strogatz<R>(graph: &mut Graph, reconnect_rate: f64, rng: &mut R) -> Result<()>
where
    R: Rng + ?Sized,
{
    reconnect(graph, reconnect_rate, RewireMode::Simple, rng)
}

/// Grows a Barabási–Albert scale-free graph by preferential attachment.
///
/// The seed is a complete graph on `min(node_count, average_degree + 1)`
/// nodes. Each later node `i` attaches to `average_degree / 2` distinct
/// existing nodes, plus one more on odd `i` when `average_degree` is odd,
/// drawn with probability proportional to their current degree.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`](crate::GraphError::InvalidParameter)
/// when `node_count + 1 < average_degree` or when both `node_count` and
/// `average_degree` are odd.
#[instrument(level = "debug", skip(rng))]
pub fn barabasi_albert<R>(node_count: usize, average_degree: usize, rng: &mut R) -> Result<Graph>
where
    R: Rng + ?Sized,
{
    if node_count.saturating_add(1) < average_degree {
        return Err(rejected(format!(
            "{node_count} node(s) cannot reach an average degree of {average_degree}"
        )));
    }
    if node_count % 2 == 1 && average_degree % 2 == 1 {
        return Err(rejected(format!(
            "node count {node_count} and average degree {average_degree} cannot both be odd"
        )));
    }

    let seed = average_degree.saturating_add(1).min(node_count);
    let mut graph = full_connect(seed);
    let mut weights = vec![seed.saturating_sub(1); seed];
    for node in seed..node_count {
        graph.add_node();
        let wanted = average_degree / 2 + if average_degree % 2 == 1 { node % 2 } else { 0 };
        let chosen = sample_by_weight(&weights, wanted, rng);
        for &target in &chosen {
            graph.add_edge(node, target, 1.0)?;
            if let Some(weight) = weights.get_mut(target) {
                *weight += 1;
            }
        }
        weights.push(chosen.len());
    }
    Ok(graph)
}

/// Draws up to `count` distinct indices, each with probability proportional
/// to its weight among those not yet drawn. Zero-weight indices are never
/// drawn.
fn sample_by_weight<R: Rng + ?Sized>(weights: &[usize], count: usize, rng: &mut R) -> Vec<usize> {
    let mut remaining = weights.to_vec();
    let mut total: usize = remaining.iter().sum();
    let mut chosen = Vec::with_capacity(count);
    while chosen.len() < count && total > 0 {
        let mut locate = rng.gen_range(0..total);
        for (index, weight) in remaining.iter_mut().enumerate() {
            if locate < *weight {
                chosen.push(index);
                total -= *weight;
                *weight = 0;
                break;
            }
            locate -= *weight;
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::sample_by_weight;

    #[rstest]
    #[case::all(vec![1, 2, 3], 3)]
    #[case::more_than_available(vec![0, 4, 0, 1], 5)]
    #[case::none(vec![5, 5], 0)]
    fn sampling_draws_distinct_weighted_indices(#[case] weights: Vec<usize>, #[case] count: usize) {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut chosen = sample_by_weight(&weights, count, &mut rng);
        let positive = weights.iter().filter(|&&weight| weight > 0).count();
        assert_eq!(chosen.len(), count.min(positive));
        assert!(chosen.iter().all(|&index| weights[index] > 0));
        chosen.sort_unstable();
        chosen.dedup();
        assert_eq!(chosen.len(), count.min(positive));
    }

    #[test]
    fn sampling_prefers_heavy_indices() {
        let mut rng = SmallRng::seed_from_u64(3);
        let weights = [1, 99];
        let heavy = (0..1_000)
            .filter(|_| sample_by_weight(&weights, 1, &mut rng) == vec![1])
            .count();
        assert!(heavy > 900, "heavy index drawn {heavy} times");
    }
}
