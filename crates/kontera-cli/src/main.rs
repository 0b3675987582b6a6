//! CLI application for telecom invoice extraction and reconciliation.

mod commands;
mod registry;
mod text;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process, train};

/// Telecom invoice reconciliation - extract billing lines and match cost bearers
#[derive(Parser)]
#[command(name = "kontera")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single invoice file
    Process(process::ProcessArgs),

    /// Process multiple invoice files
    Batch(batch::BatchArgs),

    /// Teach the detector from an example invoice
    Train(train::TrainArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()),
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()),
        Commands::Train(args) => train::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args),
    }
}
