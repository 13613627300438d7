//! # Butterfly-ecoroute CLI
//!
//! Command-line interface for the butterfly-ecoroute library.
//! Loads a signal snapshot, weighs it and prints the least-cost route.

use anyhow::{Context, Result};
use butterfly_ecoroute::{route, CostModel, Error, JsonFileSignals};
use clap::Parser;
use log::{error, LevelFilter};
use std::path::PathBuf;

mod cli;

/// Command-line interface for butterfly-ecoroute
#[derive(Parser)]
#[command(name = "butterfly-ecoroute")]
#[command(about = "Least-cost routing over congestion and emissions weighted road graphs")]
#[command(long_about = "Finds the cheapest directed route through a signal snapshot:
  butterfly-ecoroute signals.json A D                  # Route with congestion x emissions
  butterfly-ecoroute signals.json A D --json           # Machine-readable output
  butterfly-ecoroute signals.json A D -c policy.json   # Custom cost model

Exit codes:
  0 route found, 2 no route, 3 unknown node,
  4 invalid signals or cost model, 70 internal error")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    /// Signal snapshot file (JSON)
    signals: PathBuf,

    /// Start node
    from: String,

    /// Destination node
    to: String,

    /// Cost model file (JSON); defaults to congestion x emissions
    #[arg(short, long)]
    cost_model: Option<PathBuf>,

    /// Print the route as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = run(&cli) {
        let code = match e.downcast_ref::<Error>() {
            Some(err) => {
                // Keep the context (e.g. which file) ahead of the library error
                if e.chain().len() > 1 {
                    error!("{e}: {}", cli::describe_error(err));
                } else {
                    error!("{}", cli::describe_error(err));
                }
                cli::exit_code(err)
            }
            None => {
                error!("❌ Error: {e:#}");
                1
            }
        };
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.verbose {
        eprintln!("🦋 Butterfly-ecoroute v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    let model = match &cli.cost_model {
        Some(path) => CostModel::from_json_file(path)
            .with_context(|| format!("Failed to load cost model {}", path.display()))?,
        None => CostModel::default(),
    };

    let provider = JsonFileSignals::new(&cli.signals);
    let path = route(&provider, &model, &cli.from, &cli.to)?;

    println!("{}", cli::render_path(&path, cli.json));
    Ok(())
}
