pub mod distance;
pub mod tests;

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::algorithms::EnclosingSubgraph;
use crate::error::{GraphError, Result};

pub use distance::{de_node_labeling, de_plus_node_labeling, drnl_hash, drnl_node_labeling};

/// Default distance cap for distance encoding
pub const DE_MAX_DIST: u32 = 3;
/// Default distance cap for distance encoding plus
pub const DE_PLUS_MAX_DIST: u32 = 100;
/// Largest label the degree labeling emits
pub const MAX_DEGREE_LABEL: i64 = 100;

/// Structural labeling policy applied to every node of an enclosing subgraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeLabeling {
    /// Double-radius node labeling
    #[default]
    Drnl,
    /// Hop distance recorded during extraction
    Hop,
    /// 1 for the anchor pair, 0 elsewhere
    ZeroOne,
    DistanceEncoding { max_dist: u32 },
    DistanceEncodingPlus { max_dist: u32 },
    /// Weighted in-degree capped at 100
    Degree,
    /// All zeros
    NoLabel,
}

impl NodeLabeling {
    /// Resolve a policy name, applying `max_dist` to the distance-encoding variants
    pub fn parse(name: &str, max_dist: Option<u32>) -> Result<Self> {
        let labeling = match name.trim().to_ascii_lowercase().as_str() {
            "drnl" => NodeLabeling::Drnl,
            "hop" => NodeLabeling::Hop,
            "zo" | "zero-one" => NodeLabeling::ZeroOne,
            "de" | "distance-encoding" => NodeLabeling::DistanceEncoding {
                max_dist: max_dist.unwrap_or(DE_MAX_DIST),
            },
            "de+" | "distance-encoding-plus" => NodeLabeling::DistanceEncodingPlus {
                max_dist: max_dist.unwrap_or(DE_PLUS_MAX_DIST),
            },
            "degree" => NodeLabeling::Degree,
            "none" => NodeLabeling::NoLabel,
            _ => return Err(GraphError::UnknownNodeLabeling(name.to_string())),
        };
        Ok(labeling)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeLabeling::Drnl => "drnl",
            NodeLabeling::Hop => "hop",
            NodeLabeling::ZeroOne => "zo",
            NodeLabeling::DistanceEncoding { .. } => "de",
            NodeLabeling::DistanceEncodingPlus { .. } => "de+",
            NodeLabeling::Degree => "degree",
            NodeLabeling::NoLabel => "none",
        }
    }

    /// Label every node of `subgraph`; local indices 0 and 1 are the anchors
    pub fn label(&self, subgraph: &EnclosingSubgraph) -> Result<NodeLabels> {
        let adjacency = &subgraph.adjacency;
        let labels = match *self {
            NodeLabeling::Drnl => NodeLabels::Scalar(drnl_node_labeling(adjacency, 0, 1)?),
            NodeLabeling::Hop => {
                NodeLabels::Scalar(subgraph.dists.iter().map(|&d| d as i64).collect())
            }
            NodeLabeling::ZeroOne => {
                NodeLabels::Scalar(subgraph.dists.iter().map(|&d| i64::from(d == 0)).collect())
            }
            NodeLabeling::DistanceEncoding { max_dist } => {
                NodeLabels::Pair(de_node_labeling(adjacency, 0, 1, max_dist)?)
            }
            NodeLabeling::DistanceEncodingPlus { max_dist } => {
                NodeLabels::Pair(de_plus_node_labeling(adjacency, 0, 1, max_dist)?)
            }
            NodeLabeling::Degree => NodeLabels::Scalar(
                adjacency
                    .column_sums()
                    .into_iter()
                    .map(|degree| (degree as i64).min(MAX_DEGREE_LABEL))
                    .collect(),
            ),
            NodeLabeling::NoLabel => NodeLabels::Scalar(vec![0; subgraph.num_nodes()]),
        };
        Ok(labels)
    }
}

impl FromStr for NodeLabeling {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, None)
    }
}

impl fmt::Display for NodeLabeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-node structural labels of one sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeLabels {
    Scalar(Vec<i64>),
    /// Distance to source and destination, one pair per node
    Pair(Vec<[i64; 2]>),
}

impl NodeLabels {
    pub fn len(&self) -> usize {
        match self {
            NodeLabels::Scalar(z) => z.len(),
            NodeLabels::Pair(z) => z.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_scalar(&self) -> Option<&[i64]> {
        match self {
            NodeLabels::Scalar(z) => Some(z),
            NodeLabels::Pair(_) => None,
        }
    }

    pub fn as_pair(&self) -> Option<&[[i64; 2]]> {
        match self {
            NodeLabels::Pair(z) => Some(z),
            NodeLabels::Scalar(_) => None,
        }
    }

    /// Largest label value, used to size label embedding tables
    pub fn max_label(&self) -> Option<i64> {
        match self {
            NodeLabels::Scalar(z) => z.iter().copied().max(),
            NodeLabels::Pair(z) => z.iter().flat_map(|pair| pair.iter().copied()).max(),
        }
    }
}
