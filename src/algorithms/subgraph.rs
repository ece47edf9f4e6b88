use crate::graph::CsrMatrix;

/// Node-induced subgraph around a target link.
///
/// `nodes[0]` is the link source and `nodes[1]` its destination; every
/// other position follows discovery order. The entries between local
/// indices 0 and 1 are absent from `adjacency` in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingSubgraph {
    /// Global node ids, local index `i` is `nodes[i]`
    pub nodes: Vec<usize>,
    /// Induced weighted adjacency over local indices
    pub adjacency: CsrMatrix,
    /// Hop distance of each node from the target pair
    pub dists: Vec<u32>,
    pub node_features: Option<Vec<Vec<f32>>>,
    /// 1 for an observed link, 0 for a negative sample
    pub y: i64,
}

impl EnclosingSubgraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.nnz()
    }

    pub fn src(&self) -> usize {
        self.nodes[0]
    }

    pub fn dst(&self) -> usize {
        self.nodes[1]
    }
}
