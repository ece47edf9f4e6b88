pub mod sample;
pub mod dataset;
pub mod stats;

pub use sample::{build_sample, SampleRecord};
pub use dataset::{negative_sampling, pair_rng, DynamicLinkDataset, LabeledLink, LinkSplit, SubgraphExtractor};
pub use stats::{ratio_statistics, RatioReport, Summary};
