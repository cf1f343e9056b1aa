//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::Output;
use super::{item, version};
use crate::storage::{Config, ItemLoader, OutputFormat};

#[derive(Parser)]
#[command(name = "alex")]
#[command(author, version, about = "Inspect items in a personal document archive")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the global one
    #[arg(long, global = true, env = "ALEX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an item
    Show {
        /// Meta file or item directory
        path: PathBuf,
    },

    /// List an item's flags, resolved flags and classification
    Flags {
        /// Meta file or item directory
        path: PathBuf,
    },

    /// Print an item as a current-schema descriptor
    Export {
        /// Meta file or item directory
        path: PathBuf,
    },

    /// Parse a version string, or compare two
    Version {
        /// Version to parse
        first: String,

        /// Version to compare against
        second: Option<String>,
    },

    /// Load every item under an archive root
    Scan {
        /// Archive root (defaults to the configured archive_root)
        root: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let format = cli.format.unwrap_or(config.default_format);
    let output = Output::new(format, cli.verbose);
    let loader = ItemLoader::with_config(config.loader_config());

    output.verbose_ctx("config", &format!("Meta file name: {}", config.meta_filename));

    match cli.command {
        Commands::Show { path } => item::show(&output, &loader, &path)?,
        Commands::Flags { path } => item::flags(&output, &loader, &path)?,
        Commands::Export { path } => item::export(&output, &loader, &path)?,
        Commands::Version { first, second } => version::run(&output, &first, second.as_deref())?,
        Commands::Scan { root } => item::scan(&output, &loader, &config, root)?,
    }

    Ok(())
}
