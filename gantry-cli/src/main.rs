//! Gantry CLI
//!
//! Command-line interface for inspecting and changing a pipeline
//! configuration document.

mod commands;
mod config;
mod workspace;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Gantry pipeline configuration CLI", long_about = None)]
struct Cli {
    /// Path to the configuration document
    #[arg(long, env = "GANTRY_CONFIG_FILE", default_value = "gantry.json")]
    config_file: PathBuf,

    /// User the command runs as
    #[arg(long, env = "GANTRY_USER", default_value = "admin")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry_config=info,gantry_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        config_file: cli.config_file,
        user: cli.user,
    };
    config.validate()?;

    handle_command(cli.command, &config)
}
