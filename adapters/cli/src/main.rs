#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Contagion model and exports the final grid.

mod config;
mod export;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use contagion_simulation::Simulation;
use contagion_system_analytics::OutbreakSummary;
use contagion_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FileConfig, Overrides},
    export::{ExportFormat, RunReport},
};

#[derive(Parser, Debug)]
#[command(
    name = "contagion",
    version,
    about = "Run the epidemic cellular automaton and export the final grid"
)]
struct Cli {
    /// Number of grid rows.
    #[arg(long)]
    height: Option<u32>,
    /// Number of grid columns.
    #[arg(long)]
    width: Option<u32>,
    /// Number of ticks to simulate.
    #[arg(long)]
    runs: Option<u32>,
    /// Seed for the random generator; drawn from OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file providing height, width, runs, seed and outbreak.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Destination of the exported snapshot.
    #[arg(short, long, default_value = "data/modeloutput.csv")]
    output: PathBuf,
    /// Export format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
    /// Optional JSON file receiving the outbreak summary and per-tick reports.
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Entry point for the Contagion command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let overrides = Overrides {
        height: cli.height,
        width: cli.width,
        runs: cli.runs,
        seed: cli.seed,
    };
    let config = config::resolve(file, overrides, || {
        let seed: u64 = rand::random();
        info!(seed, "no seed supplied; drew one from entropy");
        seed
    })?;

    let mut simulation = Simulation::new(config);
    let world = simulation.run()?;
    let records = query::snapshot(&world);
    let summary = OutbreakSummary::from_records(&records);
    info!(
        total = summary.total,
        infected = summary.infected,
        susceptible = summary.susceptible,
        fraction = summary.infected_fraction(),
        "outbreak summary"
    );

    export::export(&records, cli.format, &cli.output)?;
    info!(path = %cli.output.display(), format = ?cli.format, "snapshot written");

    if let Some(path) = &cli.report {
        let report = RunReport {
            summary,
            ticks: simulation.analytics().reports(),
        };
        export::export_report(&report, path)?;
        info!(path = %path.display(), "run report written");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
