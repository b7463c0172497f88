//! CLI runner - executes commands

use crate::checkpoint::{CheckpointStore, ScanCheckpoint};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_scan, ScanConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::http_fetcher;
use crate::types::JsonValue;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a `scan` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Pages fetched by this run
    pub pages: u64,
    /// Items written by this run
    pub items: u64,
    /// Whether the feed was exhausted when the run stopped
    pub exhausted: bool,
    /// Token the next run would resume from
    pub continuation_token: Option<String>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing output to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match &self.cli.command {
            Commands::Scan { max_pages, reset } => {
                self.scan_to(&mut out, *max_pages, *reset).await?;
                Ok(())
            }
            Commands::Validate => self.validate_to(&mut out),
            Commands::Checkpoint => self.checkpoint_to(&mut out).await,
        }
    }

    /// Load the scan definition
    fn load_scan(&self) -> Result<ScanConfig> {
        let path = self
            .cli
            .scan
            .as_ref()
            .ok_or_else(|| Error::config("Scan file not specified (use -s flag)"))?;
        load_scan(path)
    }

    /// Open the checkpoint store, in memory when no file was given
    fn open_store(&self) -> Result<CheckpointStore> {
        match &self.cli.checkpoint {
            Some(path) => CheckpointStore::from_file(path)
                .with_context(|| format!("Cannot open checkpoint file '{}'", path.display())),
            None => Ok(CheckpointStore::in_memory()),
        }
    }

    /// Drain the feed into `out`
    pub async fn scan_to<W: Write>(
        &self,
        out: &mut W,
        max_pages: Option<u64>,
        reset: bool,
    ) -> Result<ScanSummary> {
        let start = Instant::now();
        let scan = self.load_scan()?;
        let store = self.open_store()?;

        if reset {
            store.remove(&scan.name).await?;
        }

        let mut options = scan.feed_options();
        let mut prior_items = 0;
        if let Some(checkpoint) = store.get(&scan.name).await {
            if checkpoint.kind != scan.kind {
                return Err(Error::checkpoint(format!(
                    "Checkpoint for scan '{}' was taken from a {:?} feed but the scan is now {:?}; rerun with --reset",
                    scan.name, checkpoint.kind, scan.kind
                )));
            }
            if checkpoint.is_complete() {
                info!(scan = %scan.name, "Scan already complete, nothing to fetch");
                return Ok(ScanSummary {
                    exhausted: true,
                    continuation_token: checkpoint.continuation_token,
                    ..Default::default()
                });
            }
            debug!(
                scan = %scan.name,
                continuation = ?checkpoint.continuation_token,
                items_fetched = checkpoint.items_fetched,
                "Resuming from checkpoint"
            );
            options = options.resume_from(&checkpoint);
            prior_items = checkpoint.items_fetched;
        }

        let mut fetcher = http_fetcher(scan.http_config(), options)?;
        info!(scan = %scan.name, kind = ?scan.kind, "Starting scan");

        while fetcher.should_fetch_more() {
            if max_pages.is_some_and(|max| fetcher.pages_fetched() >= max) {
                info!(scan = %scan.name, "Page limit reached, stopping");
                break;
            }

            let page = fetcher.next_page().await?;
            for item in page.items() {
                self.write_item(out, item)?;
            }
            out.flush()?;

            let checkpoint = ScanCheckpoint {
                items_fetched: prior_items + fetcher.total_items_fetched(),
                ..fetcher.checkpoint()
            };
            store.put(&scan.name, checkpoint).await?;
        }

        let summary = ScanSummary {
            pages: fetcher.pages_fetched(),
            items: fetcher.total_items_fetched(),
            exhausted: fetcher.is_exhausted(),
            continuation_token: fetcher.continuation_token().map(str::to_owned),
        };
        info!(
            scan = %scan.name,
            pages = summary.pages,
            items = summary.items,
            exhausted = summary.exhausted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan finished"
        );
        Ok(summary)
    }

    /// Validate the scan definition and report the options it resolves to
    pub fn validate_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let scan = self.load_scan()?;
        let options = scan.feed_options();
        writeln!(
            out,
            "Scan '{}' is valid: {:?} feed, max_item_count={}, top={}",
            scan.name, scan.kind, options.max_item_count, options.top
        )?;
        Ok(())
    }

    /// Print the stored checkpoint for the scan
    pub async fn checkpoint_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let scan = self.load_scan()?;
        let store = self.open_store()?;
        match store.get(&scan.name).await {
            Some(checkpoint) => writeln!(out, "{}", serde_json::to_string_pretty(&checkpoint)?)?,
            None => writeln!(out, "No checkpoint for scan '{}'", scan.name)?,
        }
        Ok(())
    }

    fn write_item<W: Write>(&self, out: &mut W, item: &JsonValue) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(item)?)?,
            OutputFormat::Pretty => writeln!(out, "{}", serde_json::to_string_pretty(item)?)?,
        }
        Ok(())
    }
}
