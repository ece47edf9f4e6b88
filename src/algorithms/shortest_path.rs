use std::collections::VecDeque;
use crate::graph::CsrMatrix;
use crate::error::{GraphError, Result};

/// Unweighted hop distances from the nearest of `sources`, treating every
/// stored entry of `adjacency` as an undirected edge. `None` marks a node in
/// a different component.
pub fn unweighted_distances(adjacency: &CsrMatrix, sources: &[usize]) -> Result<Vec<Option<u32>>> {
    let (n, n_cols) = adjacency.shape();
    if n != n_cols {
        return Err(GraphError::algorithm(format!(
            "Shortest paths need a square adjacency, got {}x{}",
            n, n_cols
        )));
    }

    let reverse = adjacency.transpose();
    let mut distances: Vec<Option<u32>> = vec![None; n];
    let mut queue = VecDeque::new();

    for &source in sources {
        if source >= n {
            return Err(GraphError::node_not_found(source.to_string()));
        }
        if distances[source].is_none() {
            distances[source] = Some(0);
            queue.push_back(source);
        }
    }

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[current].map(|d| d + 1);
        let forward = adjacency.row_indices(current);
        let backward = reverse.row_indices(current);
        for &neighbor in forward.iter().chain(backward) {
            if distances[neighbor].is_none() {
                distances[neighbor] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    Ok(distances)
}

/// Index bookkeeping for a node-deleted view of an `len`-node graph.
///
/// Deleting node `removed` shifts every later index down by one; this type
/// owns that arithmetic so callers never adjust indices by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRemoval {
    removed: usize,
    len: usize,
}

impl NodeRemoval {
    pub fn new(removed: usize, len: usize) -> Result<Self> {
        if removed >= len {
            return Err(GraphError::node_not_found(removed.to_string()));
        }
        Ok(NodeRemoval { removed, len })
    }

    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Number of nodes left after the deletion
    pub fn reduced_len(&self) -> usize {
        self.len - 1
    }

    /// Original indices of the surviving nodes, in order
    pub fn kept_nodes(&self) -> Vec<usize> {
        (0..self.len).filter(|&i| i != self.removed).collect()
    }

    /// Index of original node `node` in the reduced graph
    pub fn to_reduced(&self, node: usize) -> Option<usize> {
        if node >= self.len || node == self.removed {
            None
        } else if node > self.removed {
            Some(node - 1)
        } else {
            Some(node)
        }
    }

    /// Original index of reduced node `reduced`
    pub fn to_original(&self, reduced: usize) -> usize {
        if reduced >= self.removed {
            reduced + 1
        } else {
            reduced
        }
    }

    /// Expand a per-node vector of the reduced graph back to the original
    /// index space, placing `value` at the removed position
    pub fn reinsert<T>(&self, mut reduced: Vec<T>, value: T) -> Vec<T> {
        reduced.insert(self.removed, value);
        reduced
    }
}
