use std::path::Path;
use serde::Deserialize;
use crate::algorithms::{FringeSampler, KHopSampler, RandomWalkParams, RandomWalkSampler, SubgraphSampler};
use crate::graph::LinkGraph;
use crate::labeling::NodeLabeling;
use crate::error::{GraphError, Result};

/// Settings shared by every extraction in a batch
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawExtractionConfig")]
pub struct ExtractionConfig {
    pub num_hops: usize,
    pub ratio_per_hop: f64,
    pub max_nodes_per_hop: Option<usize>,
    /// Follow incoming as well as outgoing edges during BFS
    pub directed: bool,
    pub node_labeling: NodeLabeling,
    /// When set, subgraphs come from random walks instead of k-hop BFS
    pub random_walk: Option<RandomWalkParams>,
    /// Run seed; each pair derives its own generator from it
    pub seed: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            num_hops: 1,
            ratio_per_hop: 1.0,
            max_nodes_per_hop: None,
            directed: false,
            node_labeling: NodeLabeling::Drnl,
            random_walk: None,
            seed: 0,
        }
    }
}

impl ExtractionConfig {
    pub fn new(num_hops: usize) -> Self {
        Self { num_hops, ..Self::default() }
    }

    pub fn with_ratio_per_hop(mut self, ratio: f64) -> Self {
        self.ratio_per_hop = ratio;
        self
    }

    pub fn with_max_nodes_per_hop(mut self, max_nodes: usize) -> Self {
        self.max_nodes_per_hop = Some(max_nodes);
        self
    }

    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn with_node_labeling(mut self, labeling: NodeLabeling) -> Self {
        self.node_labeling = labeling;
        self
    }

    pub fn with_random_walk(mut self, params: RandomWalkParams) -> Self {
        self.random_walk = Some(params);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.ratio_per_hop > 0.0 && self.ratio_per_hop <= 1.0) {
            return Err(GraphError::invalid_parameter(format!(
                "ratio_per_hop must be in (0.0, 1.0], got {}",
                self.ratio_per_hop
            )));
        }
        if self.max_nodes_per_hop == Some(0) {
            return Err(GraphError::invalid_parameter(
                "max_nodes_per_hop must be greater than 0"
            ));
        }
        if let Some(params) = self.random_walk {
            RandomWalkParams::new(params.walk_length, params.num_walks)?;
        }
        Ok(())
    }

    /// Directed k-hop extraction needs a graph that kept edge directions
    pub fn check_graph(&self, graph: &LinkGraph) -> Result<()> {
        if self.directed && self.random_walk.is_none() && !graph.is_directed() {
            return Err(GraphError::invalid_parameter(
                "directed extraction requires a graph built with directed=true"
            ));
        }
        Ok(())
    }

    /// Same settings with random-walk sampling switched off
    pub fn k_hop_only(&self) -> Self {
        Self { random_walk: None, ..self.clone() }
    }

    /// The extraction strategy these settings select
    pub fn sampler(&self) -> Result<Box<dyn SubgraphSampler>> {
        self.validate()?;
        Ok(match self.random_walk {
            Some(params) => Box::new(RandomWalkSampler::new(params)),
            None => {
                let fringe = FringeSampler::new(self.ratio_per_hop, self.max_nodes_per_hop, self.directed)?;
                Box::new(KHopSampler::new(self.num_hops, fringe))
            }
        })
    }
}

fn default_num_hops() -> usize {
    1
}

fn default_ratio() -> f64 {
    1.0
}

fn default_node_label() -> String {
    "drnl".to_string()
}

/// On-disk form of [`ExtractionConfig`]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExtractionConfig {
    #[serde(default = "default_num_hops")]
    num_hops: usize,
    #[serde(default = "default_ratio")]
    ratio_per_hop: f64,
    #[serde(default)]
    max_nodes_per_hop: Option<usize>,
    #[serde(default)]
    directed: bool,
    #[serde(default = "default_node_label")]
    node_label: String,
    #[serde(default)]
    max_dist: Option<u32>,
    #[serde(default)]
    walk_length: Option<usize>,
    #[serde(default)]
    num_walks: Option<usize>,
    #[serde(default)]
    seed: u64,
}

impl TryFrom<RawExtractionConfig> for ExtractionConfig {
    type Error = GraphError;

    fn try_from(raw: RawExtractionConfig) -> Result<Self> {
        let node_labeling = NodeLabeling::parse(&raw.node_label, raw.max_dist)?;

        let random_walk = match (raw.walk_length.unwrap_or(0), raw.num_walks.unwrap_or(0)) {
            (0, 0) => None,
            (walk_length, num_walks) if walk_length > 0 && num_walks > 0 => {
                Some(RandomWalkParams { walk_length, num_walks })
            }
            (walk_length, num_walks) => {
                return Err(GraphError::invalid_parameter(format!(
                    "Random-walk sampling needs both walk_length and num_walks > 0, got walk_length={}, num_walks={}",
                    walk_length, num_walks
                )));
            }
        };

        let config = ExtractionConfig {
            num_hops: raw.num_hops,
            ratio_per_hop: raw.ratio_per_hop,
            max_nodes_per_hop: raw.max_nodes_per_hop,
            directed: raw.directed,
            node_labeling,
            random_walk,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::ExtractionConfig;
    use crate::algorithms::RandomWalkParams;
    use crate::labeling::NodeLabeling;
    use crate::error::GraphError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = ExtractionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ExtractionConfig::default());
        assert_eq!(config.sampler().unwrap().name(), "k_hop");
    }

    #[test]
    fn test_full_json() {
        let config = ExtractionConfig::from_json_str(r#"{
            "num_hops": 2,
            "ratio_per_hop": 0.5,
            "max_nodes_per_hop": 10,
            "directed": true,
            "node_label": "de+",
            "max_dist": 5,
            "walk_length": 3,
            "num_walks": 4,
            "seed": 99
        }"#).unwrap();

        assert_eq!(config.num_hops, 2);
        assert_eq!(config.max_nodes_per_hop, Some(10));
        assert_eq!(config.node_labeling, NodeLabeling::DistanceEncodingPlus { max_dist: 5 });
        assert_eq!(config.random_walk, Some(RandomWalkParams { walk_length: 3, num_walks: 4 }));
        assert_eq!(config.seed, 99);
        assert_eq!(config.sampler().unwrap().name(), "random_walk");
        assert_eq!(config.k_hop_only().sampler().unwrap().name(), "k_hop");
    }

    #[test]
    fn test_zero_walk_parameters_select_k_hop() {
        let config = ExtractionConfig::from_json_str(r#"{"walk_length": 0, "num_walks": 0}"#).unwrap();
        assert_eq!(config.random_walk, None);
    }

    #[test]
    fn test_half_specified_random_walk_rejected() {
        for json in [r#"{"walk_length": 3}"#, r#"{"walk_length": 3, "num_walks": 0}"#, r#"{"num_walks": 2}"#] {
            let err = ExtractionConfig::from_json_str(json).unwrap_err();
            assert!(err.to_string().contains("walk_length"), "{}", err);
        }
    }

    #[test]
    fn test_unknown_label_rejected_at_load() {
        let err = ExtractionConfig::from_json_str(r#"{"node_label": "spectral"}"#).unwrap_err();
        assert!(err.to_string().contains("spectral"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ExtractionConfig::from_json_str(r#"{"hops": 2}"#).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(ExtractionConfig::new(1).with_ratio_per_hop(0.0).validate().is_err());
        assert!(ExtractionConfig::new(1).with_ratio_per_hop(1.2).validate().is_err());
        assert!(ExtractionConfig::new(1).with_max_nodes_per_hop(0).validate().is_err());
        let zero_walk = ExtractionConfig::new(1)
            .with_random_walk(RandomWalkParams { walk_length: 0, num_walks: 2 });
        assert!(matches!(zero_walk.validate(), Err(GraphError::InvalidParameter(_))));
        assert!(zero_walk.sampler().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"num_hops": 3, "node_label": "hop"}}"#).unwrap();

        let config = ExtractionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.num_hops, 3);
        assert_eq!(config.node_labeling, NodeLabeling::Hop);
        assert!(ExtractionConfig::from_json_file("/nonexistent/config.json").is_err());
    }
}
