use std::collections::BTreeSet;
use rand_pcg::Pcg64;
use crate::algorithms::{EnclosingSubgraph, FringeSampler, SubgraphSampler};
use crate::graph::LinkGraph;
use crate::error::{GraphError, Result};

/// Deterministic k-hop BFS extraction around a target link
#[derive(Debug, Clone)]
pub struct KHopSampler {
    num_hops: usize,
    fringe: FringeSampler,
}

impl KHopSampler {
    pub fn new(num_hops: usize, fringe: FringeSampler) -> Self {
        KHopSampler { num_hops, fringe }
    }

    pub fn num_hops(&self) -> usize {
        self.num_hops
    }

    /// Discover the node sequence and per-node hop distances
    fn discover(
        &self,
        graph: &LinkGraph,
        src: usize,
        dst: usize,
        rng: &mut Pcg64,
    ) -> Result<(Vec<usize>, Vec<u32>)> {
        let mut nodes = vec![src, dst];
        let mut dists = vec![0u32, 0];
        let mut visited: BTreeSet<usize> = [src, dst].into_iter().collect();
        let mut fringe = visited.clone();

        for dist in 1..=self.num_hops {
            let next = self.fringe.expand(graph, &fringe, &mut visited, rng)?;
            if next.is_empty() {
                log::debug!(
                    "Fringe of ({}, {}) exhausted at hop {} of {}",
                    src, dst, dist, self.num_hops
                );
                break;
            }

            let hop = u32::try_from(dist)
                .map_err(|_| GraphError::invalid_parameter("num_hops exceeds u32::MAX"))?;
            nodes.extend(next.iter().copied());
            dists.extend(std::iter::repeat(hop).take(next.len()));
            fringe = next.into_iter().collect();
        }

        Ok((nodes, dists))
    }
}

impl SubgraphSampler for KHopSampler {
    fn sample(
        &self,
        graph: &LinkGraph,
        src: usize,
        dst: usize,
        y: i64,
        rng: &mut Pcg64,
    ) -> Result<EnclosingSubgraph> {
        graph.check_pair(src, dst)?;

        let (nodes, dists) = self.discover(graph, src, dst, rng)?;

        let mut adjacency = graph.adjacency().submatrix(&nodes)?;
        // Remove the target link from the subgraph.
        adjacency.remove_link(0, 1);

        let node_features = graph.slice_features(&nodes);

        Ok(EnclosingSubgraph {
            nodes,
            adjacency,
            dists,
            node_features,
            y,
        })
    }

    fn name(&self) -> &'static str {
        "k_hop"
    }

    fn description(&self) -> &'static str {
        "Breadth-first k-hop enclosing subgraph with optional per-hop subsampling"
    }
}
