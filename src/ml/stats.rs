use std::fmt;
use serde::Serialize;
use crate::config::ExtractionConfig;
use crate::graph::LinkGraph;
use crate::ml::dataset::{pair_rng, LinkSplit};
use crate::error::{GraphError, Result};

/// Mean and population standard deviation of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Summary { mean: 0.0, std: 0.0 };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Summary { mean, std: variance.sqrt() }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ± {:.2}", self.mean, self.std)
    }
}

/// Size of k-hop subgraphs relative to random-walk subgraphs over one split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioReport {
    pub split: String,
    pub num_pairs: usize,
    pub k_hop_nodes: Summary,
    pub random_walk_nodes: Summary,
    pub k_hop_edges: Summary,
    pub random_walk_edges: Summary,
    pub node_ratio: Summary,
    pub edge_ratio: Summary,
}

/// Extract every link of `split` with both strategies and compare sizes.
///
/// `config` must carry random-walk parameters; its k-hop settings drive the
/// BFS side. The edge ratio of a pair whose random-walk subgraph has no
/// edges is 0.
pub fn ratio_statistics(
    graph: &LinkGraph,
    config: &ExtractionConfig,
    split: &LinkSplit,
    split_name: &str,
) -> Result<RatioReport> {
    if config.random_walk.is_none() {
        return Err(GraphError::invalid_parameter(
            "ratio statistics need walk_length and num_walks to be set"
        ));
    }

    let k_hop_config = config.k_hop_only();
    k_hop_config.check_graph(graph)?;
    let k_hop = k_hop_config.sampler()?;
    let random_walk = config.sampler()?;
    let links = split.labeled_links();

    log::info!("Computing node/edge ratios for {} links of split '{}'", links.len(), split_name);

    let mut k_hop_nodes = Vec::with_capacity(links.len());
    let mut random_walk_nodes = Vec::with_capacity(links.len());
    let mut k_hop_edges = Vec::with_capacity(links.len());
    let mut random_walk_edges = Vec::with_capacity(links.len());
    let mut node_ratio = Vec::with_capacity(links.len());
    let mut edge_ratio = Vec::with_capacity(links.len());

    for (index, link) in links.iter().enumerate() {
        let seal = k_hop.sample(graph, link.src, link.dst, link.y, &mut pair_rng(config.seed, index))?;
        let walked = random_walk.sample(graph, link.src, link.dst, link.y, &mut pair_rng(config.seed, index))?;

        let (seal_nodes, walked_nodes) = (seal.num_nodes() as f64, walked.num_nodes() as f64);
        let (seal_edges, walked_edges) = (seal.num_edges() as f64, walked.num_edges() as f64);

        node_ratio.push(seal_nodes / walked_nodes);
        edge_ratio.push(if walked_edges == 0.0 { 0.0 } else { seal_edges / walked_edges });
        k_hop_nodes.push(seal_nodes);
        random_walk_nodes.push(walked_nodes);
        k_hop_edges.push(seal_edges);
        random_walk_edges.push(walked_edges);
    }

    let report = RatioReport {
        split: split_name.to_string(),
        num_pairs: links.len(),
        k_hop_nodes: Summary::from_values(&k_hop_nodes),
        random_walk_nodes: Summary::from_values(&random_walk_nodes),
        k_hop_edges: Summary::from_values(&k_hop_edges),
        random_walk_edges: Summary::from_values(&random_walk_edges),
        node_ratio: Summary::from_values(&node_ratio),
        edge_ratio: Summary::from_values(&edge_ratio),
    };

    log::info!("Split '{}': node ratio {}, edge ratio {}", split_name, report.node_ratio, report.edge_ratio);
    Ok(report)
}
