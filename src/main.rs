mod app;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use memory_graph::config::{EngineConfig, GraphVariant};
use memory_graph::layout::{LayoutEngine, LayoutInput};
use memory_graph::model::{SpaceFilter, load_documents};
use memory_graph::overrides::PositionOverrides;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file holding a document array or a `{ "documents": [...] }` body.
    documents: PathBuf,

    /// Space to show, or `all`.
    #[arg(long, default_value = "all")]
    space: SpaceFilter,

    #[arg(long, value_enum)]
    variant: Option<GraphVariant>,

    /// Engine config JSON. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the computed layout as JSON and exit without opening a window.
    #[arg(long)]
    export: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(args: &Args) {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_target(false)
            .init();
        return;
    }

    let level = if args.quiet {
        Level::ERROR
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn export_layout(args: &Args, config: EngineConfig, output: &Path) -> Result<()> {
    let documents = load_documents(&args.documents)?
        .into_iter()
        .map(std::sync::Arc::new)
        .collect::<Vec<_>>();
    let engine = LayoutEngine::new(config.layout);
    let overrides = PositionOverrides::new();
    let layout = engine.compute(&LayoutInput {
        documents: &documents,
        space: &args.space,
        overrides: &overrides,
        dragging_node_id: None,
    });

    let json = serde_json::to_string_pretty(&layout).context("failed to serialize layout")?;
    fs::write(output, json)
        .with_context(|| format!("failed to write layout to {}", output.display()))?;
    tracing::info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        path = %output.display(),
        "exported layout"
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(variant) = args.variant {
        config.variant = variant;
    }

    if let Some(output) = &args.export {
        return export_layout(&args, config, output);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "memory-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::MemoryGraphApp::new(
                cc,
                args.documents.clone(),
                args.space.clone(),
                config.clone(),
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run viewer: {error}"))
}
