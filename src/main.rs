use circuitnet::config_loader::{self, CliOverrides};
use circuitnet::orchestrator;
use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

/// Scenario geometry generator for ring and figure-eight traffic circuits
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the network layout (defaults to net_params.net_path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the lane count from the configuration
    #[arg(long)]
    lanes: Option<u32>,

    /// Override the seed used to shuffle initial positions
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting circuitnet scenario generator");
    info!("Configuration file: {:?}", args.config);

    let mut config = config_loader::load_config(&args.config)?;

    let overrides = CliOverrides {
        lanes: args.lanes,
        seed: args.seed,
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    let (scenario, artifacts) =
        orchestrator::generate_scenario_artifacts(&config, args.output.as_deref())?;

    info!(
        "Scenario '{}' ready: total length {:.4}",
        scenario.name(),
        scenario.total_length()
    );
    info!("Network layout: {:?}", artifacts.layout_path);
    info!("Initial positions: {:?}", artifacts.positions_path);
    Ok(())
}
