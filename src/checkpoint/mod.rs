//! Checkpoint module
//!
//! Persists scan checkpoints so an interrupted scan can resume from its last
//! completed page.
//!
//! # Overview
//!
//! The checkpoint module provides:
//! - `ScanCheckpoint` - Resumable state captured from a fetcher
//! - `CheckpointDocument` - Named checkpoints, the on-disk format
//! - `CheckpointStore` - File-based persistence with atomic writes

mod store;
mod types;

pub use store::CheckpointStore;
pub use types::{CheckpointDocument, ScanCheckpoint};

#[cfg(test)]
mod store_tests;
