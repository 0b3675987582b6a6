//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use kontera_core::KonteraConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g. "matching.acceptance_threshold")
        key: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Path => show_path(),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kontera")
        .join("config.json")
}

fn load_or_default() -> anyhow::Result<KonteraConfig> {
    let config_path = default_config_path();
    if config_path.exists() {
        Ok(KonteraConfig::from_file(&config_path)?)
    } else {
        Ok(KonteraConfig::default())
    }
}

fn show_config() -> anyhow::Result<()> {
    if !default_config_path().exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    println!("{}", serde_json::to_string_pretty(&load_or_default()?)?);
    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    KonteraConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default()?)?;

    let mut current = &json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    println!("{}", serde_json::to_string_pretty(current)?);
    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'kontera config init' to create a configuration file.");
    }

    Ok(())
}
