use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use cosmograph::chain::{
    AddressMetadataCache, Direction, SnapshotSource, SortOrder, Transfer, TransferFilter,
    filter_and_sort,
};
use cosmograph::graph::{BuildOptions, GraphLink, build_transfer_graph};
use cosmograph::layout::{LayoutMode, PositionedNode, generate_layout};
use cosmograph::project::{Projected, project};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON array of transfer records from the indexing provider.
    #[arg(long)]
    transfers: PathBuf,

    /// Address the graph is centered on.
    #[arg(long)]
    address: String,

    #[arg(long, value_enum, default_value = "both")]
    direction: Direction,

    #[arg(long, value_enum, default_value = "newest")]
    order: SortOrder,

    #[arg(long)]
    max_count: Option<usize>,

    #[arg(long, value_enum, default_value = "shell")]
    layout: LayoutMode,

    /// Optional address -> {balance, isContract} snapshot file. Addresses
    /// missing from it resolve to sentinel metadata.
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// In-flight metadata lookup bound.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Seed for the layout RNG; omit for entropy.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 0.0)]
    rotate_x: f32,

    #[arg(long, default_value_t = 0.0)]
    rotate_y: f32,

    /// Include projected screen coordinates at the given rotation.
    #[arg(long)]
    project: bool,

    /// Write the positioned graph here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    layout: LayoutMode,
    target_node_id: &'a str,
    nodes: Vec<OutputNode>,
    links: &'a [GraphLink],
}

#[derive(Serialize)]
struct OutputNode {
    #[serde(flatten)]
    positioned: PositionedNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    projected: Option<Projected>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = fs::read_to_string(&args.transfers)
        .with_context(|| format!("failed to read transfers from {}", args.transfers.display()))?;
    let transfers: Vec<Transfer> = serde_json::from_str(&raw).context("invalid transfer JSON")?;

    let filter = TransferFilter {
        direction: args.direction,
        address: Some(args.address.clone()),
        order: args.order,
        max_count: args.max_count,
    };
    let filtered = filter_and_sort(&transfers, &filter);
    log::debug!("kept {} of {} transfers", filtered.len(), transfers.len());

    let source = match &args.metadata {
        Some(path) => SnapshotSource::from_file(path)?,
        None => SnapshotSource::empty(),
    };
    let cache = AddressMetadataCache::new(Arc::new(source));

    let target_id = args.address.to_ascii_lowercase();
    let report = |done: usize, total: usize| log::debug!("resolved metadata {done}/{total}");
    let options = BuildOptions {
        focus: Some(&target_id),
        concurrency: args.concurrency,
        progress: Some(&report),
    };
    let graph = build_transfer_graph(&filtered, &cache, &options).await;
    log::debug!(
        "built graph with {} nodes and {} links",
        graph.node_count(),
        graph.links.len()
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let positioned = generate_layout(&graph, args.layout, &target_id, &mut rng);

    let nodes = positioned
        .into_iter()
        .map(|positioned| {
            let projected = args
                .project
                .then(|| project(positioned.position, args.rotate_x, args.rotate_y));
            OutputNode {
                positioned,
                projected,
            }
        })
        .collect::<Vec<_>>();

    let output = Output {
        layout: args.layout,
        target_node_id: &target_id,
        nodes,
        links: &graph.links,
    };
    let rendered =
        serde_json::to_string_pretty(&output).context("failed to serialize graph output")?;

    match &args.out {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}
