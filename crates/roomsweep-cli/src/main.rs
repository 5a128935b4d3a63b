//! Roomsweep CLI - Room acoustic measurement from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomsweep")]
#[command(author, version, about = "Room acoustic measurement with logarithmic sine sweeps", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sweeps, inverse filters and simulated recordings
    Generate(commands::generate::GenerateArgs),

    /// Analyze a recording of the sweep
    Analyze(commands::analyze::AnalyzeArgs),

    /// Inspect a microphone calibration file
    Calibration(commands::calibration::CalibrationArgs),

    /// List, show and create measurement profiles
    Profile(commands::profile::ProfileArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Calibration(args) => commands::calibration::run(args),
        Commands::Profile(args) => commands::profile::run(args),
    }
}
