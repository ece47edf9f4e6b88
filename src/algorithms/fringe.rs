use std::collections::BTreeSet;
use rand::seq::index;
use rand_pcg::Pcg64;
use crate::graph::LinkGraph;
use crate::error::{GraphError, Result};

/// Which side of the adjacency a neighbor query follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Rows of `A`: nodes `v` with an edge `u -> v`
    Outgoing,
    /// Columns of `A`: nodes `v` with an edge `v -> u` (needs the transposed adjacency)
    Incoming,
}

/// All nodes one hop away from any node in `fringe`
pub fn neighbors(
    fringe: &BTreeSet<usize>,
    graph: &LinkGraph,
    direction: Direction,
) -> Result<BTreeSet<usize>> {
    let matrix = match direction {
        Direction::Outgoing => graph.adjacency(),
        Direction::Incoming => graph.transposed().ok_or_else(|| GraphError::invalid_parameter(
            "Incoming neighbor queries require a graph built with directed=true"
        ))?,
    };

    let mut result = BTreeSet::new();
    for &node in fringe {
        if !graph.has_node(node) {
            return Err(GraphError::node_not_found(node.to_string()));
        }
        result.extend(matrix.row_indices(node).iter().copied());
    }

    Ok(result)
}

/// Computes the next BFS fringe and applies per-hop subsampling
#[derive(Debug, Clone, PartialEq)]
pub struct FringeSampler {
    ratio_per_hop: f64,
    max_nodes_per_hop: Option<usize>,
    directed: bool,
}

impl FringeSampler {
    pub fn new(ratio_per_hop: f64, max_nodes_per_hop: Option<usize>, directed: bool) -> Result<Self> {
        if !(ratio_per_hop > 0.0 && ratio_per_hop <= 1.0) {
            return Err(GraphError::invalid_parameter(
                "ratio_per_hop must be in (0.0, 1.0]"
            ));
        }
        if max_nodes_per_hop == Some(0) {
            return Err(GraphError::invalid_parameter(
                "max_nodes_per_hop must be greater than 0"
            ));
        }

        Ok(FringeSampler { ratio_per_hop, max_nodes_per_hop, directed })
    }

    pub fn unsampled(directed: bool) -> Self {
        FringeSampler { ratio_per_hop: 1.0, max_nodes_per_hop: None, directed }
    }

    /// Expand `fringe` by one hop.
    ///
    /// Newly discovered nodes are added to `visited` before subsampling, so a
    /// node dropped by the sampler is never rediscovered at a later hop. The
    /// returned nodes are in ascending id order.
    pub fn expand(
        &self,
        graph: &LinkGraph,
        fringe: &BTreeSet<usize>,
        visited: &mut BTreeSet<usize>,
        rng: &mut Pcg64,
    ) -> Result<Vec<usize>> {
        let mut next = neighbors(fringe, graph, Direction::Outgoing)?;
        if self.directed {
            next.extend(neighbors(fringe, graph, Direction::Incoming)?);
        }

        let discovered: Vec<usize> = next.difference(visited).copied().collect();
        visited.extend(discovered.iter().copied());

        let mut kept = discovered;
        if self.ratio_per_hop < 1.0 {
            let amount = (self.ratio_per_hop * kept.len() as f64) as usize;
            kept = sample_sorted(&kept, amount, rng);
        }
        if let Some(cap) = self.max_nodes_per_hop {
            if cap < kept.len() {
                kept = sample_sorted(&kept, cap, rng);
            }
        }

        Ok(kept)
    }
}

/// Uniform sample of `amount` items without replacement, returned in input order
fn sample_sorted(items: &[usize], amount: usize, rng: &mut Pcg64) -> Vec<usize> {
    let mut picked = index::sample(rng, items.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| items[i]).collect()
}
