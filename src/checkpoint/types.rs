//! Checkpoint types
//!
//! These types are serialized to JSON and persisted between runs.

use crate::feed::FeedKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resumable state of a single scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCheckpoint {
    /// Feed kind the checkpoint was taken from
    #[serde(default)]
    pub kind: FeedKind,
    /// Token to resume from
    #[serde(default)]
    pub continuation_token: Option<String>,
    /// Items fetched before the checkpoint
    #[serde(default)]
    pub items_fetched: u64,
    /// Whether the scan was exhausted when checkpointed
    #[serde(default)]
    pub exhausted: bool,
}

impl ScanCheckpoint {
    /// Check if resuming would have nothing left to fetch
    ///
    /// An exhausted change feed is only caught up; its token still resumes.
    pub fn is_complete(&self) -> bool {
        self.exhausted && !self.kind.is_change_feed()
    }
}

/// Every checkpoint kept in one store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointDocument {
    /// Checkpoints keyed by scan name
    #[serde(default)]
    pub scans: HashMap<String, ScanCheckpoint>,
}

impl CheckpointDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a scan's checkpoint
    pub fn get(&self, scan: &str) -> Option<&ScanCheckpoint> {
        self.scans.get(scan)
    }

    /// Insert or replace a scan's checkpoint
    pub fn put(&mut self, scan: &str, checkpoint: ScanCheckpoint) {
        self.scans.insert(scan.to_string(), checkpoint);
    }

    /// Remove a scan's checkpoint
    pub fn remove(&mut self, scan: &str) -> Option<ScanCheckpoint> {
        self.scans.remove(scan)
    }
}
