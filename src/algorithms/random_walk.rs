use std::collections::BTreeSet;
use hashbrown::HashMap;
use rand::distributions::{Distribution, WeightedIndex};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use crate::algorithms::{unweighted_distances, EnclosingSubgraph, SubgraphSampler};
use crate::graph::{CsrMatrix, LinkGraph};
use crate::error::{GraphError, Result};

/// Walk length `m` and walks per endpoint `M`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomWalkParams {
    pub walk_length: usize,
    pub num_walks: usize,
}

impl RandomWalkParams {
    pub fn new(walk_length: usize, num_walks: usize) -> Result<Self> {
        if walk_length == 0 {
            return Err(GraphError::invalid_parameter(
                "walk_length must be greater than 0"
            ));
        }

        if num_walks == 0 {
            return Err(GraphError::invalid_parameter(
                "num_walks must be greater than 0"
            ));
        }

        Ok(RandomWalkParams { walk_length, num_walks })
    }
}

/// Random-walk enclosing subgraph: the union of `2M` walks of length `m`
/// started from both link endpoints, with the induced edges taken from the
/// global edge list.
#[derive(Debug, Clone)]
pub struct RandomWalkSampler {
    params: RandomWalkParams,
}

impl RandomWalkSampler {
    pub fn new(params: RandomWalkParams) -> Self {
        RandomWalkSampler { params }
    }

    pub fn params(&self) -> RandomWalkParams {
        self.params
    }

    /// Launch `M` walks from `src` and `M` from `dst`, alternating starts
    pub fn walks(
        &self,
        graph: &LinkGraph,
        src: usize,
        dst: usize,
        rng: &mut Pcg64,
    ) -> Result<Vec<Vec<usize>>> {
        let mut all_walks = Vec::with_capacity(2 * self.params.num_walks);

        for _ in 0..self.params.num_walks {
            for start_node in [src, dst] {
                if !graph.has_node(start_node) {
                    return Err(GraphError::node_not_found(start_node.to_string()));
                }
                all_walks.push(self.single_random_walk(graph, start_node, rng)?);
            }
        }

        Ok(all_walks)
    }

    /// Perform a single weighted random walk of up to `m` steps
    fn single_random_walk(
        &self,
        graph: &LinkGraph,
        start_node: usize,
        rng: &mut Pcg64,
    ) -> Result<Vec<usize>> {
        let adjacency = graph.adjacency();
        let mut walk = Vec::with_capacity(self.params.walk_length + 1);
        let mut current_node = start_node;
        walk.push(current_node);

        for _ in 0..self.params.walk_length {
            let neighbors = adjacency.row_indices(current_node);
            if neighbors.is_empty() {
                break; // Dead end - end walk early
            }

            let weights = adjacency.row_values(current_node);
            let choice = WeightedIndex::new(weights).map_err(|e| GraphError::algorithm(format!(
                "Cannot walk from node {}: {}",
                current_node, e
            )))?;
            current_node = neighbors[choice.sample(rng)];
            walk.push(current_node);
        }

        Ok(walk)
    }
}

impl SubgraphSampler for RandomWalkSampler {
    fn sample(
        &self,
        graph: &LinkGraph,
        src: usize,
        dst: usize,
        y: i64,
        rng: &mut Pcg64,
    ) -> Result<EnclosingSubgraph> {
        graph.check_pair(src, dst)?;

        let visited: BTreeSet<usize> = self
            .walks(graph, src, dst, rng)?
            .into_iter()
            .flatten()
            .collect();

        // Anchors first, remaining walked nodes in ascending id order
        let mut nodes = vec![src, dst];
        nodes.extend(visited.into_iter().filter(|&n| n != src && n != dst));

        let local: HashMap<usize, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect();

        let edges = graph.edges();
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut values = Vec::new();
        for ((s, t), &w) in edges.sources.iter().zip(&edges.targets).zip(&edges.weights) {
            if let (Some(&ls), Some(&lt)) = (local.get(s), local.get(t)) {
                // Remove target link from the subgraph.
                let is_target = (ls == 0 && lt == 1) || (ls == 1 && lt == 0);
                if !is_target {
                    rows.push(ls);
                    cols.push(lt);
                    values.push(w);
                }
            }
        }

        let adjacency = CsrMatrix::from_triplets(nodes.len(), nodes.len(), &rows, &cols, &values)?;
        let dists = hop_distances(&adjacency)?;
        let node_features = graph.slice_features(&nodes);

        log::debug!(
            "Random-walk subgraph for ({}, {}): {} nodes, {} edges",
            src, dst, nodes.len(), adjacency.nnz()
        );

        Ok(EnclosingSubgraph {
            nodes,
            adjacency,
            dists,
            node_features,
            y,
        })
    }

    fn name(&self) -> &'static str {
        "random_walk"
    }

    fn description(&self) -> &'static str {
        "Union of seeded random walks from both link endpoints, induced on the global edge list"
    }
}

/// Hop distance of each local node from the anchor pair. Nodes the walk
/// reached only through the removed target link sit one hop past the
/// farthest reachable node.
fn hop_distances(adjacency: &CsrMatrix) -> Result<Vec<u32>> {
    let distances = unweighted_distances(adjacency, &[0, 1])?;
    let fallback = distances.iter().flatten().max().map_or(1, |&d| d + 1);
    Ok(distances.into_iter().map(|d| d.unwrap_or(fallback)).collect())
}
