mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(version, about = "Switchyard CLI - check route tables and resolve paths", long_about = None)]
struct Cli {
    /// Route table to load (default: ./routes.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log route and validator registration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and register every route in the table
    Check,

    /// Resolve one or more paths against the table
    Resolve {
        /// Request paths such as /products/42
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

/// `-v` shows registration at debug level
fn log_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .init();

    // Execute command
    let ok = match cli.command {
        Commands::Check => commands::check::execute(cli.config.as_deref())?,
        Commands::Resolve { paths } => commands::resolve::execute(cli.config.as_deref(), &paths)?,
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
