//! LabelScan CLI - structured product-label extraction from photos.
//!
//! Sends one or more photos of a product's packaging to a multimodal LLM and
//! prints the filled product record as JSON. When the model or its API
//! misbehaves the empty template is printed instead.
//!
//! # Usage
//!
//! ```bash
//! # Extract from the front and back of a package
//! labelscan extract front.jpg back.jpg
//!
//! # Write one JSON line per run to a log
//! labelscan extract label.png --format jsonl --output records.jsonl
//!
//! # Show the product template sent to the model
//! labelscan schema
//!
//! # View configuration
//! labelscan config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use labelscan_core::Config;
use std::path::{Path, PathBuf};

mod cli;
mod logging;

/// LabelScan - structured product-label extraction from photos.
#[derive(Parser, Debug)]
#[command(name = "labelscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "LABELSCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract a product record from one or more label photos
    Extract(cli::extract::ExtractArgs),

    /// Print the product template the model is asked to fill
    Schema,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let writes_config = matches!(
        &cli.command,
        Commands::Config(cli::config::ConfigArgs {
            command: cli::config::ConfigCommand::Init { .. }
        })
    );
    let config = load_config(cli.config.as_deref(), writes_config)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("LabelScan v{}", labelscan_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Extract(args) => cli::extract::execute(args, config).await,
        Commands::Schema => cli::schema::execute(),
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}

/// Load the configuration the command runs with.
///
/// A broken file at the default location only warns and falls back to the
/// defaults. A file named with `--config` must load, unless the command is
/// about to write it (`config init`).
fn load_config(explicit: Option<&Path>, writes_config: bool) -> anyhow::Result<Config> {
    match explicit {
        Some(_) if writes_config => Ok(Config::default()),
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Cannot load config {}", path.display())),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                // Logging isn't initialized yet.
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `labelscan config path`."
                );
                Ok(Config::default())
            }
        },
    }
}
