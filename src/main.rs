//! Command line frontend for the control field search

use clap::Parser;
use multicf::{Config, build_forest, load_portals_from_csv};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Enumerate nested control fields over a set of portals
#[derive(Debug, Parser)]
#[command(name = "multicf", version)]
struct Cli {
    /// CSV file with latitude,longitude,name columns
    csv: PathBuf,

    /// Maximum nesting depth (multiplicity)
    #[arg(short = 'd', long = "depth", default_value_t = 4)]
    depth: u32,
}

fn main() -> multicf::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let portals = load_portals_from_csv(&cli.csv)?;
    let outcome = build_forest(&portals, &Config {
        max_depth: cli.depth,
    })?;

    for failure in &outcome.failures {
        tracing::warn!(
            vertex_ids = ?failure.vertex_ids,
            message = %failure.message,
            "branch failed"
        );
    }
    tracing::info!(
        roots = outcome.fields.len(),
        total = outcome.total_fields(),
        max_depth = cli.depth,
        "search complete"
    );

    serde_json::to_writer_pretty(std::io::stdout().lock(), &outcome.fields)
        .map_err(std::io::Error::other)?;
    println!();
    Ok(())
}
