use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, Int64Array, UInt32Array, UInt64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use crate::error::{GraphError, Result};
use crate::graph::CsrMatrix;

/// Global edge list in input order: `sources[i] -> targets[i]` with `weights[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeList {
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub weights: Vec<f64>,
}

impl EdgeList {
    /// Unit-weight edge list from `(source, target)` pairs
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        EdgeList {
            sources: pairs.iter().map(|&(s, _)| s).collect(),
            targets: pairs.iter().map(|&(_, t)| t).collect(),
            weights: vec![1.0; pairs.len()],
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != self.sources.len() {
            return Err(GraphError::graph_construction(format!(
                "Expected {} edge weights, got {}",
                self.sources.len(),
                weights.len()
            )));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Merge parallel edges into one edge carrying the summed weight.
    /// The result is sorted by `(source, target)`.
    pub fn coalesce(&self) -> EdgeList {
        let mut edges: Vec<(usize, usize, f64)> = self
            .sources
            .iter()
            .zip(&self.targets)
            .zip(&self.weights)
            .map(|((&s, &t), &w)| (s, t, w))
            .collect();
        edges.sort_by_key(|&(s, t, _)| (s, t));

        let mut merged = EdgeList::default();
        for (s, t, w) in edges {
            let last = merged.sources.len();
            if last > 0 && merged.sources[last - 1] == s && merged.targets[last - 1] == t {
                merged.weights[last - 1] += w;
            } else {
                merged.sources.push(s);
                merged.targets.push(t);
                merged.weights.push(w);
            }
        }
        merged
    }

    fn max_node(&self) -> Option<usize> {
        self.sources.iter().chain(&self.targets).copied().max()
    }
}

/// Options applied while building a [`LinkGraph`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Keep the transposed adjacency for reverse-neighbor queries
    pub directed: bool,
    /// Merge parallel edges before building the adjacency
    pub coalesce: bool,
}

/// The global graph shared read-only by every extraction
#[derive(Debug, Clone)]
pub struct LinkGraph {
    num_nodes: usize,
    adjacency: CsrMatrix,
    transposed: Option<CsrMatrix>,
    edges: EdgeList,
    node_features: Option<Vec<Vec<f32>>>,
}

impl LinkGraph {
    /// Build the adjacency over nodes `0..num_nodes` from an edge list
    pub fn new(num_nodes: usize, edges: EdgeList, options: GraphOptions) -> Result<Self> {
        if edges.targets.len() != edges.sources.len() || edges.weights.len() != edges.sources.len() {
            return Err(GraphError::graph_construction(
                "Edge list columns must have equal length"
            ));
        }
        if let Some(max) = edges.max_node() {
            if max >= num_nodes {
                return Err(GraphError::graph_construction(format!(
                    "Edge endpoint {} out of range for graph with {} nodes",
                    max, num_nodes
                )));
            }
        }

        let edges = if options.coalesce { edges.coalesce() } else { edges };
        let adjacency = CsrMatrix::from_triplets(
            num_nodes,
            num_nodes,
            &edges.sources,
            &edges.targets,
            &edges.weights,
        )?;
        let transposed = if options.directed {
            Some(adjacency.transpose())
        } else {
            None
        };

        log::debug!(
            "Built adjacency: {} nodes, {} edges, {} stored entries, directed={}",
            num_nodes,
            edges.len(),
            adjacency.nnz(),
            options.directed
        );

        Ok(LinkGraph {
            num_nodes,
            adjacency,
            transposed,
            edges,
            node_features: None,
        })
    }

    /// Unit-weight graph from `(source, target)` pairs
    pub fn from_edges(num_nodes: usize, pairs: &[(usize, usize)], directed: bool) -> Result<Self> {
        Self::new(
            num_nodes,
            EdgeList::from_pairs(pairs),
            GraphOptions { directed, coalesce: false },
        )
    }

    /// Undirected unit-weight graph with every pair inserted in both directions
    pub fn undirected(num_nodes: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let both: Vec<(usize, usize)> = pairs
            .iter()
            .flat_map(|&(s, t)| [(s, t), (t, s)])
            .collect();
        Self::from_edges(num_nodes, &both, false)
    }

    /// Build from an edges RecordBatch.
    ///
    /// Expected schema: source (integer), target (integer), [weight (Float64)].
    /// When `num_nodes` is `None` it is inferred as the largest endpoint + 1.
    pub fn from_record_batch(
        edges: &RecordBatch,
        num_nodes: Option<usize>,
        options: GraphOptions,
    ) -> Result<Self> {
        if edges.num_columns() < 2 {
            return Err(GraphError::graph_construction(
                "Edges table must have at least source and target columns"
            ));
        }

        let sources = id_column(edges.column(0), "source")?;
        let targets = id_column(edges.column(1), "target")?;

        // Handle optional weight column
        let weights = if edges.num_columns() >= 3 {
            weight_column(edges.column(2))?
        } else {
            vec![1.0; sources.len()]
        };

        let edge_list = EdgeList { sources, targets, weights };
        let num_nodes = match num_nodes {
            Some(n) => n,
            None => edge_list.max_node().map(|m| m + 1).unwrap_or(0),
        };

        Self::new(num_nodes, edge_list, options)
    }

    /// Attach one feature row per node
    pub fn with_node_features(mut self, features: Vec<Vec<f32>>) -> Result<Self> {
        if features.len() != self.num_nodes {
            return Err(GraphError::graph_construction(format!(
                "Expected {} feature rows, got {}",
                self.num_nodes,
                features.len()
            )));
        }
        self.node_features = Some(features);
        Ok(self)
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.transposed.is_some()
    }

    /// Row-compressed adjacency `A`
    pub fn adjacency(&self) -> &CsrMatrix {
        &self.adjacency
    }

    /// Column-compressed view of `A` (stored as the CSR of `A^T`), directed graphs only
    pub fn transposed(&self) -> Option<&CsrMatrix> {
        self.transposed.as_ref()
    }

    /// The global edge list after optional coalescing
    pub fn edges(&self) -> &EdgeList {
        &self.edges
    }

    pub fn node_features(&self) -> Option<&[Vec<f32>]> {
        self.node_features.as_deref()
    }

    pub fn has_node(&self, node: usize) -> bool {
        node < self.num_nodes
    }

    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.adjacency.get(source, target) != 0.0
    }

    /// Out-neighbors of a single node; empty for a node outside the graph
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.row_indices(node)
    }

    /// Feature rows for `nodes`, in order
    pub fn slice_features(&self, nodes: &[usize]) -> Option<Vec<Vec<f32>>> {
        self.node_features
            .as_ref()
            .map(|features| nodes.iter().map(|&n| features[n].clone()).collect())
    }

    /// Validate a candidate link before extraction
    pub fn check_pair(&self, src: usize, dst: usize) -> Result<()> {
        if src == dst {
            return Err(GraphError::InvalidLinkPair { src, dst });
        }
        for node in [src, dst] {
            if !self.has_node(node) {
                return Err(GraphError::node_not_found(node.to_string()));
            }
        }
        Ok(())
    }
}

/// Non-null integer node ids of `column`
pub(crate) fn id_column(column: &ArrayRef, name: &str) -> Result<Vec<usize>> {
    let any = column.as_any();
    if column.null_count() > 0 {
        return Err(GraphError::graph_construction(format!(
            "Column {} must not contain nulls",
            name
        )));
    }

    if let Some(array) = any.downcast_ref::<UInt32Array>() {
        return Ok(array.values().iter().map(|&v| v as usize).collect());
    }
    if let Some(array) = any.downcast_ref::<UInt64Array>() {
        return Ok(array.values().iter().map(|&v| v as usize).collect());
    }
    if let Some(array) = any.downcast_ref::<Int64Array>() {
        return array.values().iter().map(|&v| signed_id(v, name)).collect();
    }
    if let Some(array) = any.downcast_ref::<Int32Array>() {
        return array.values().iter().map(|&v| signed_id(v as i64, name)).collect();
    }

    Err(GraphError::graph_construction(format!(
        "Column {} must be an integer node id column, found {:?}",
        name,
        column.data_type()
    )))
}

fn signed_id(value: i64, name: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| GraphError::graph_construction(format!(
        "Negative node id {} in column {}",
        value, name
    )))
}

/// Edge weights of any numeric column as f64; nulls become 1.0
fn weight_column(column: &ArrayRef) -> Result<Vec<f64>> {
    if !column.data_type().is_numeric() {
        return Err(GraphError::graph_construction(format!(
            "Third column of edges table must be numeric (weight), found {:?}",
            column.data_type()
        )));
    }

    let weights = cast(column, &DataType::Float64)?;
    let weights = weights
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| GraphError::graph_construction("Weight column did not cast to Float64"))?;

    Ok(weights.iter().map(|w| w.unwrap_or(1.0)).collect())
}
