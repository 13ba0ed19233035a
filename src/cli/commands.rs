//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Client-side pagination orchestrator CLI
#[derive(Parser, Debug)]
#[command(name = "paginator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source definition file (YAML)
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch records page by page
    Fetch {
        /// Base URL (overrides or replaces the source file)
        #[arg(long)]
        base_url: Option<String>,

        /// Endpoint path
        #[arg(long)]
        path: Option<String>,

        /// Dot path to the records array
        #[arg(long)]
        records_path: Option<String>,

        /// Dot path to the next cursor
        #[arg(long)]
        next_path: Option<String>,

        /// Record identity field
        #[arg(long)]
        id_field: Option<String>,

        /// Stop after this many pages (default: all)
        #[arg(long)]
        pages: Option<usize>,

        /// Retries after a failed page before giving up
        #[arg(long, default_value = "1")]
        max_retries: u32,
    },

    /// Validate a source definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
