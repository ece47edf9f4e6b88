use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use arrow_seal::prelude::*;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "arrow-seal")]
#[command(about = "Enclosing-subgraph extraction for link prediction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and label one enclosing subgraph per link, written as JSON lines
    Extract {
        /// CSV with header: source, target[, weight]
        #[arg(short, long)]
        edges: PathBuf,
        /// CSV with header: src, dst[, y]; y defaults to 1
        #[arg(short, long)]
        pairs: PathBuf,
        /// JSON extraction settings; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        num_nodes: Option<usize>,
        #[arg(long)]
        directed: bool,
        #[arg(long)]
        coalesce: bool,
        #[arg(long)]
        parallel: bool,
        /// Worker threads for --parallel (defaults to the number of CPUs)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Compare k-hop and random-walk subgraph sizes over a set of links
    Stats {
        #[arg(short, long)]
        edges: PathBuf,
        #[arg(short, long)]
        pairs: PathBuf,
        /// JSON extraction settings with walk_length and num_walks
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value = "train")]
        split: String,
        #[arg(long)]
        num_nodes: Option<usize>,
        #[arg(long)]
        directed: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    let format = Format::default().with_header(true);
    let (schema, _) = format
        .infer_schema(&mut file, Some(100))
        .with_context(|| format!("inferring CSV schema of {:?}", path))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)?;
    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("reading {:?}", path))?;

    Ok(concat_batches(&schema, &batches)?)
}

fn load_graph(path: &Path, num_nodes: Option<usize>, directed: bool, coalesce: bool) -> Result<LinkGraph> {
    let edges = read_csv(path)?;
    let graph = LinkGraph::from_record_batch(&edges, num_nodes, GraphOptions { directed, coalesce })
        .with_context(|| format!("building graph from {:?}", path))?;
    log::info!("Loaded graph with {} nodes and {} edges", graph.num_nodes(), graph.num_edges());
    Ok(graph)
}

/// Pairs file as labeled links in file-row order
fn load_links(path: &Path) -> Result<Vec<LabeledLink>> {
    let batch = read_csv(path)?;
    LabeledLink::from_record_batch(&batch).with_context(|| format!("reading pairs from {:?}", path))
}

fn load_config(path: Option<&Path>, directed: bool) -> Result<ExtractionConfig> {
    let config = match path {
        Some(path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => ExtractionConfig::default(),
    };
    Ok(if directed { config.with_directed(true) } else { config })
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { edges, pairs, config, output, num_nodes, directed, coalesce, parallel, workers } => {
            let graph = load_graph(&edges, num_nodes, directed, coalesce)?;
            let links = load_links(&pairs)?;
            let config = load_config(config.as_deref(), directed)?;
            let extractor = SubgraphExtractor::new(&graph, config)?;

            if parallel {
                let threads = workers.unwrap_or_else(num_cpus::get);
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("configuring worker pool")?;
            }

            let records = if parallel {
                extractor.par_extract_labeled(&links)?
            } else {
                extractor.extract_labeled(&links)?
            };
            let positives = links.iter().filter(|link| link.y > 0).count();

            let file = File::create(&output).with_context(|| format!("creating {:?}", output))?;
            let mut writer = BufWriter::new(file);
            for record in &records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;

            println!(
                "Wrote {} samples ({} positive, {} negative) to {:?}",
                records.len(),
                positives,
                links.len() - positives,
                output
            );
        }
        Commands::Stats { edges, pairs, config, split: split_name, num_nodes, directed, output } => {
            let graph = load_graph(&edges, num_nodes, directed, false)?;
            let split = LinkSplit::from_links(&load_links(&pairs)?);
            let config = load_config(Some(config.as_path()), directed)?;

            let report = ratio_statistics(&graph, &config, &split, &split_name)?;
            let json = serde_json::to_string_pretty(&report)?;

            match output {
                Some(path) => std::fs::write(&path, json).with_context(|| format!("writing {:?}", path))?,
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
