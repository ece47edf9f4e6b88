use arrow::array::{Array, Int64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use hashbrown::HashSet;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::algorithms::{EnclosingSubgraph, SubgraphSampler};
use crate::config::ExtractionConfig;
use crate::graph::link_graph::id_column;
use crate::graph::LinkGraph;
use crate::ml::sample::{build_sample, SampleRecord};
use crate::error::{GraphError, Result};

/// Generator for the pair at position `index` of a batch.
///
/// Seeding per pair keeps results independent of scheduling, so sequential
/// and parallel batches agree record for record.
pub fn pair_rng(seed: u64, index: usize) -> Pcg64 {
    Pcg64::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// A candidate link with its target label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledLink {
    pub src: usize,
    pub dst: usize,
    pub y: i64,
}

impl LabeledLink {
    /// Read candidate links from a pairs table, keeping row order.
    ///
    /// Expected schema: src (integer), dst (integer), [y (integer)]. A row
    /// whose label is `<= 0` gets `y = 0`; any other row, including one with
    /// no label, gets `y = 1`.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<LabeledLink>> {
        if batch.num_columns() < 2 {
            return Err(GraphError::invalid_parameter(
                "Pairs table must have at least src and dst columns"
            ));
        }

        let sources = id_column(batch.column(0), "src")?;
        let targets = id_column(batch.column(1), "dst")?;

        let labels = if batch.num_columns() >= 3 {
            let column = batch.column(2);
            if !column.data_type().is_integer() {
                return Err(GraphError::invalid_parameter(format!(
                    "Label column y must hold integers, found {:?}",
                    column.data_type()
                )));
            }
            let labels = cast(column, &DataType::Int64)?;
            let labels = labels
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| GraphError::invalid_parameter("Label column did not cast to Int64"))?;
            labels.iter().map(|y| i64::from(y.map_or(true, |y| y > 0))).collect()
        } else {
            vec![1; sources.len()]
        };

        Ok(sources
            .into_iter()
            .zip(targets)
            .zip(labels)
            .map(|((src, dst), y)| LabeledLink { src, dst, y })
            .collect())
    }
}

/// Runs extraction, labeling and sample assembly against one shared graph
pub struct SubgraphExtractor<'g> {
    graph: &'g LinkGraph,
    config: ExtractionConfig,
    sampler: Box<dyn SubgraphSampler>,
}

impl<'g> SubgraphExtractor<'g> {
    /// Validates `config` against `graph` before any pair is touched
    pub fn new(graph: &'g LinkGraph, config: ExtractionConfig) -> Result<Self> {
        let sampler = config.sampler()?;
        config.check_graph(graph)?;

        Ok(SubgraphExtractor { graph, config, sampler })
    }

    pub fn graph(&self) -> &LinkGraph {
        self.graph
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn strategy(&self) -> &'static str {
        self.sampler.name()
    }

    /// Extract the enclosing subgraph of one link with an explicit generator
    pub fn extract_subgraph(&self, src: usize, dst: usize, y: i64, rng: &mut Pcg64) -> Result<EnclosingSubgraph> {
        self.sampler.sample(self.graph, src, dst, y, rng)
    }

    /// Build the record for the link at batch position `index`
    pub fn extract(&self, index: usize, link: LabeledLink) -> Result<SampleRecord> {
        let mut rng = pair_rng(self.config.seed, index);
        let subgraph = self.extract_subgraph(link.src, link.dst, link.y, &mut rng)?;
        build_sample(subgraph, &self.config.node_labeling)
    }

    /// Sequentially extract every link, preserving input order
    pub fn extract_labeled(&self, links: &[LabeledLink]) -> Result<Vec<SampleRecord>> {
        log::info!(
            "Extracting {} enclosing subgraphs ({}, labeling={})",
            links.len(),
            self.strategy(),
            self.config.node_labeling
        );

        links
            .iter()
            .enumerate()
            .map(|(index, &link)| self.extract(index, link))
            .collect()
    }

    /// Parallel form of [`Self::extract_labeled`]; output order matches input order
    pub fn par_extract_labeled(&self, links: &[LabeledLink]) -> Result<Vec<SampleRecord>> {
        log::info!(
            "Extracting {} enclosing subgraphs on {} threads ({}, labeling={})",
            links.len(),
            rayon::current_num_threads(),
            self.strategy(),
            self.config.node_labeling
        );

        links
            .par_iter()
            .enumerate()
            .map(|(index, &link)| self.extract(index, link))
            .collect()
    }

    /// Extract every `(src, dst)` pair with the same target label `y`
    pub fn extract_enclosing_subgraphs(&self, links: &[(usize, usize)], y: i64) -> Result<Vec<SampleRecord>> {
        self.extract_labeled(&label_links(links, y))
    }

    pub fn par_extract_enclosing_subgraphs(&self, links: &[(usize, usize)], y: i64) -> Result<Vec<SampleRecord>> {
        self.par_extract_labeled(&label_links(links, y))
    }

    /// Positive records followed by negative records
    pub fn extract_split(&self, split: &LinkSplit, parallel: bool) -> Result<Vec<SampleRecord>> {
        let links = split.labeled_links();
        if parallel {
            self.par_extract_labeled(&links)
        } else {
            self.extract_labeled(&links)
        }
    }
}

fn label_links(links: &[(usize, usize)], y: i64) -> Vec<LabeledLink> {
    links.iter().map(|&(src, dst)| LabeledLink { src, dst, y }).collect()
}

/// Positive and negative candidate links of one data split
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSplit {
    pub positive: Vec<(usize, usize)>,
    pub negative: Vec<(usize, usize)>,
}

impl LinkSplit {
    pub fn new(positive: Vec<(usize, usize)>, negative: Vec<(usize, usize)>) -> Self {
        LinkSplit { positive, negative }
    }

    /// Pair `positive` with `neg_ratio` sampled non-edges per positive link
    pub fn with_sampled_negatives(
        graph: &LinkGraph,
        positive: Vec<(usize, usize)>,
        neg_ratio: usize,
        rng: &mut Pcg64,
    ) -> Result<Self> {
        let negative = negative_sampling(graph, positive.len() * neg_ratio, rng)?;
        Ok(LinkSplit { positive, negative })
    }

    /// Group labeled links into positives (`y > 0`) and negatives
    pub fn from_links(links: &[LabeledLink]) -> Self {
        let (positive, negative): (Vec<LabeledLink>, Vec<LabeledLink>) =
            links.iter().partition(|link| link.y > 0);
        LinkSplit {
            positive: positive.iter().map(|link| (link.src, link.dst)).collect(),
            negative: negative.iter().map(|link| (link.src, link.dst)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positive links with `y = 1`, then negative links with `y = 0`
    pub fn labeled_links(&self) -> Vec<LabeledLink> {
        let mut links = label_links(&self.positive, 1);
        links.extend(label_links(&self.negative, 0));
        links
    }

    /// Keep a random `percent`% of the positive and of the negative links
    pub fn subsample(&self, percent: f64, rng: &mut Pcg64) -> Result<Self> {
        if !(percent > 0.0 && percent <= 100.0) {
            return Err(GraphError::invalid_parameter(format!(
                "percent must be in (0, 100], got {}",
                percent
            )));
        }

        let mut keep = |links: &[(usize, usize)]| -> Vec<(usize, usize)> {
            let mut shuffled = links.to_vec();
            shuffled.shuffle(rng);
            shuffled.truncate((percent / 100.0 * links.len() as f64) as usize);
            shuffled
        };

        let positive = keep(&self.positive);
        let negative = keep(&self.negative);
        Ok(LinkSplit { positive, negative })
    }
}

/// Draw `count` distinct pairs `(u, v)`, `u != v`, with no edge `u -> v`
pub fn negative_sampling(graph: &LinkGraph, count: usize, rng: &mut Pcg64) -> Result<Vec<(usize, usize)>> {
    let n = graph.num_nodes();
    let existing = graph.adjacency().nnz();
    let available = (n * n.saturating_sub(1)).saturating_sub(existing);
    if count > available {
        return Err(GraphError::invalid_parameter(format!(
            "Cannot draw {} negative links from a graph with {} free node pairs",
            count, available
        )));
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(count);
    let mut negatives = Vec::with_capacity(count);
    while negatives.len() < count {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v || graph.has_edge(u, v) || !seen.insert((u, v)) {
            continue;
        }
        negatives.push((u, v));
    }

    Ok(negatives)
}

/// Lazily extracts records on request, one per link of a split
pub struct DynamicLinkDataset<'g> {
    extractor: SubgraphExtractor<'g>,
    links: Vec<LabeledLink>,
}

impl<'g> DynamicLinkDataset<'g> {
    pub fn new(graph: &'g LinkGraph, split: &LinkSplit, config: ExtractionConfig) -> Result<Self> {
        Ok(DynamicLinkDataset {
            extractor: SubgraphExtractor::new(graph, config)?,
            links: split.labeled_links(),
        })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[LabeledLink] {
        &self.links
    }

    /// Record `index`, identical to the `index`-th record of a batch extraction
    pub fn get(&self, index: usize) -> Result<SampleRecord> {
        let link = *self.links.get(index).ok_or_else(|| GraphError::invalid_parameter(format!(
            "Index {} out of range for dataset of {} links",
            index,
            self.links.len()
        )))?;
        self.extractor.extract(index, link)
    }
}
