//! FlowDeck CLI - host for the voice engine and the control surface.

mod commands;
mod session;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowdeck")]
#[command(author, version, about = "FlowDeck voice FX engine and control host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the voice engine and serve commands on stdin
    Run(commands::run::RunArgs),

    /// List audio devices
    Devices(commands::devices::DevicesArgs),

    /// List configured voice presets
    Presets(commands::presets::PresetsArgs),

    /// Validate a config file
    Check(commands::check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    // stdout carries responses; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Check(args) => commands::check::run(args),
    }
}
