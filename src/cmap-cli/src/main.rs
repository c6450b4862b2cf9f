// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! `cmap`: lay out concept maps, synthesize path queries and write path
//! reports from a JSON triple model.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cmap_engine::{
    BreadthFirstSearch, Config, GraphMode, LayoutStrategy, Model, generate_layout, write_query,
    write_report,
};

#[derive(Parser)]
#[command(name = "cmap", version)]
#[command(about = "Graph algorithms over concept-map triple models", long_about = None)]
struct Cli {
    /// Log debug events
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonOpts {
    /// Model to read, as JSON
    model: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Layout strategy: auto, radial, circular or external-tool
    #[arg(long)]
    strategy: Option<LayoutStrategy>,

    /// Graph construction mode: link or concept
    #[arg(long)]
    mode: Option<GraphMode>,

    /// Wall-clock budget for the auto layout, in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Lay out the graph without removing cycle edges
    #[arg(long)]
    no_break_cycles: bool,

    /// Also separate links from each other
    #[arg(long)]
    avoid_link_overlap: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute positions and write the updated model
    Layout {
        #[command(flatten)]
        common: CommonOpts,

        /// Where to write the model; defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a query joining the source and target resources
    Query {
        #[command(flatten)]
        common: CommonOpts,

        /// Query file; the readable variant is written beside it
        #[arg(short, long)]
        output: PathBuf,

        /// Add every other statement of the model
        #[arg(long)]
        include_all_nodes: bool,

        /// Add the other properties of each resource on the path
        #[arg(long)]
        include_path_properties: bool,
    },

    /// Write hop-count paths from the root concept to every other concept
    Report {
        /// Model to read, as JSON
        model: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn load_config(opts: &CommonOpts) -> Result<Config> {
    let mut config = match &opts.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(strategy) = opts.strategy {
        config.strategy = strategy;
    }
    if let Some(mode) = opts.mode {
        config.graph_mode = mode;
    }
    if let Some(ms) = opts.duration_ms {
        config.layout_duration_ms = ms;
    }
    if opts.no_break_cycles {
        config.break_cycles = false;
    }
    if opts.avoid_link_overlap {
        config.avoid_link_overlap = true;
    }
    Ok(config)
}

fn load_model(path: &Path) -> Result<Model> {
    Model::load(path).with_context(|| format!("loading model {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Layout { common, output } => {
            let config = load_config(&common)?;
            if config.strategy.is_inert() {
                info!(strategy = %config.strategy, "positions will only be normalized");
            }
            let mut model = load_model(&common.model)?;
            let summary = generate_layout(&mut model, &config).context("layout failed")?;

            let output = output.unwrap_or(common.model);
            model
                .save(&output)
                .with_context(|| format!("writing model {}", output.display()))?;
            info!(
                nodes = summary.nodes,
                removed_edges = summary.removed_edges,
                output = %output.display(),
                "layout done"
            );
        }
        Commands::Query {
            common,
            output,
            include_all_nodes,
            include_path_properties,
        } => {
            let mut config = load_config(&common)?;
            config.include_all_nodes |= include_all_nodes;
            config.include_path_properties |= include_path_properties;
            let model = load_model(&common.model)?;

            let text = write_query(&model, &config, &output).context("query synthesis failed")?;
            if !text.found_path {
                warn!(output = %output.display(), "no path joins the source and target resources");
            }
        }
        Commands::Report { model, output } => {
            let model = load_model(&model)?;
            let report =
                write_report(&model, &BreadthFirstSearch, &output).context("path report failed")?;
            info!(
                reached = report.instance_lines.len(),
                unreachable = report.unreachable.len(),
                "report done"
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}
