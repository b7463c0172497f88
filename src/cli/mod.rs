//! CLI module
//!
//! Command-line interface for draining feeds.
//!
//! # Commands
//!
//! - `scan` - Drain a feed, printing items as JSON lines
//! - `validate` - Check a scan definition
//! - `checkpoint` - Show the stored checkpoint for a scan

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{Runner, ScanSummary};
