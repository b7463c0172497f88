//! CLI commands and argument parsing

use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated feed fetcher CLI
#[derive(Parser, Debug)]
#[command(name = "feedfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scan definition file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub scan: Option<PathBuf>,

    /// Checkpoint file (JSON); enables resume
    #[arg(short, long, global = true)]
    pub checkpoint: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level implied by the flags
    pub fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain the feed
    Scan {
        /// Stop after this many pages (the scan stays resumable)
        #[arg(long)]
        max_pages: Option<u64>,

        /// Ignore and discard any stored checkpoint
        #[arg(long)]
        reset: bool,
    },

    /// Validate the scan definition
    Validate,

    /// Show the stored checkpoint for the scan
    Checkpoint,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON item per line
    Json,
    /// Pretty-printed JSON items
    Pretty,
}
