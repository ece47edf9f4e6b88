use std::sync::Arc;
use arrow::array::{ArrayRef, Float64Array, Int64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use crate::algorithms::EnclosingSubgraph;
use crate::labeling::{NodeLabeling, NodeLabels};
use crate::error::{GraphError, Result};

/// One labeled enclosing subgraph, ready for a graph classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Global node ids; index 0 and 1 are the target link endpoints
    pub node_ids: Vec<usize>,
    /// `[sources, targets]` over local indices
    pub edge_index: [Vec<usize>; 2],
    pub edge_weight: Vec<f64>,
    pub x: Option<Vec<Vec<f32>>>,
    pub z: NodeLabels,
    pub y: i64,
    pub num_nodes: usize,
}

impl SampleRecord {
    pub fn num_edges(&self) -> usize {
        self.edge_weight.len()
    }

    /// Edges as an Arrow batch: source, target (local indices), weight
    pub fn edges_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("source", DataType::UInt64, false),
            Field::new("target", DataType::UInt64, false),
            Field::new("weight", DataType::Float64, false),
        ]));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(UInt64Array::from_iter_values(self.edge_index[0].iter().map(|&s| s as u64))),
                Arc::new(UInt64Array::from_iter_values(self.edge_index[1].iter().map(|&t| t as u64))),
                Arc::new(Float64Array::from(self.edge_weight.clone())),
            ],
        ).map_err(GraphError::from)
    }

    /// Nodes as an Arrow batch: global node_id plus `z`, or `z_src`/`z_dst`
    /// for pair labels
    pub fn nodes_batch(&self) -> Result<RecordBatch> {
        let node_ids: ArrayRef = Arc::new(UInt64Array::from_iter_values(
            self.node_ids.iter().map(|&n| n as u64),
        ));

        let mut fields = vec![Field::new("node_id", DataType::UInt64, false)];
        let mut columns = vec![node_ids];

        match &self.z {
            NodeLabels::Scalar(z) => {
                fields.push(Field::new("z", DataType::Int64, false));
                columns.push(Arc::new(Int64Array::from(z.clone())));
            }
            NodeLabels::Pair(z) => {
                fields.push(Field::new("z_src", DataType::Int64, false));
                fields.push(Field::new("z_dst", DataType::Int64, false));
                columns.push(Arc::new(Int64Array::from_iter_values(z.iter().map(|p| p[0]))));
                columns.push(Arc::new(Int64Array::from_iter_values(z.iter().map(|p| p[1]))));
            }
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(GraphError::from)
    }
}

/// Turn an extracted subgraph into a sample record.
///
/// The edge list is read straight off the induced adjacency, so the removed
/// target link never appears in it.
pub fn build_sample(subgraph: EnclosingSubgraph, labeling: &NodeLabeling) -> Result<SampleRecord> {
    let z = labeling.label(&subgraph)?;
    let (rows, cols, weights) = subgraph.adjacency.triplets();
    let num_nodes = subgraph.nodes.len();

    if weights.is_empty() {
        log::debug!(
            "Subgraph for ({}, {}) has no edges after link removal",
            subgraph.src(), subgraph.dst()
        );
    }

    Ok(SampleRecord {
        node_ids: subgraph.nodes,
        edge_index: [rows, cols],
        edge_weight: weights,
        x: subgraph.node_features,
        z,
        y: subgraph.y,
        num_nodes,
    })
}
