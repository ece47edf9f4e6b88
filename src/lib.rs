pub mod graph;
pub mod algorithms;
pub mod labeling;
pub mod ml;
pub mod config;
pub mod error;

pub use graph::{CsrMatrix, EdgeList, GraphOptions, LinkGraph};
pub use algorithms::{EnclosingSubgraph, KHopSampler, RandomWalkParams, RandomWalkSampler, SubgraphSampler};
pub use labeling::{NodeLabeling, NodeLabels};
pub use ml::{build_sample, DynamicLinkDataset, LinkSplit, SampleRecord, SubgraphExtractor};
pub use config::ExtractionConfig;
pub use error::{GraphError, Result};

pub mod prelude {
    pub use crate::graph::{CsrMatrix, EdgeList, GraphOptions, LinkGraph};
    pub use crate::algorithms::{
        EnclosingSubgraph, FringeSampler, KHopSampler, RandomWalkParams, RandomWalkSampler, SubgraphSampler,
    };
    pub use crate::labeling::{NodeLabeling, NodeLabels};
    pub use crate::ml::{
        build_sample, negative_sampling, pair_rng, ratio_statistics, DynamicLinkDataset, LabeledLink,
        LinkSplit, RatioReport, SampleRecord, SubgraphExtractor,
    };
    pub use crate::config::ExtractionConfig;
    pub use crate::error::{GraphError, Result};
}
