//! Checkpoint store implementation
//!
//! Provides file-based checkpoint persistence with atomic writes.

use super::types::{CheckpointDocument, ScanCheckpoint};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Store for persisting and loading scan checkpoints
#[derive(Debug)]
pub struct CheckpointStore {
    /// Path to the checkpoint file (empty for in-memory)
    path: PathBuf,
    /// Current document (cached)
    document: Arc<RwLock<CheckpointDocument>>,
    /// Whether to save on every update
    auto_save: bool,
}

impl CheckpointStore {
    /// Create a store backed by `path`, starting empty
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            document: Arc::new(RwLock::new(CheckpointDocument::new())),
            auto_save: true,
        }
    }

    /// Create an in-memory store (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            document: Arc::new(RwLock::new(CheckpointDocument::new())),
            auto_save: false,
        }
    }

    /// Create a store from a file, loading existing checkpoints if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::checkpoint(format!("Failed to read checkpoint file: {e}")))?;
            parse_document(&contents)?
        } else {
            CheckpointDocument::new()
        };

        Ok(Self {
            path,
            document: Arc::new(RwLock::new(document)),
            auto_save: true,
        })
    }

    /// Reload checkpoints from the backing file
    pub async fn load(&self) -> Result<()> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::checkpoint(format!("Failed to read checkpoint file: {e}")))?;
        let loaded = parse_document(&contents)?;

        *self.document.write().await = loaded;
        Ok(())
    }

    /// Write checkpoints to the backing file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = {
            let document = self.document.read().await;
            serde_json::to_string_pretty(&*document)
                .map_err(|e| Error::checkpoint(format!("Failed to serialize checkpoints: {e}")))?
        };

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::checkpoint(format!("Failed to write checkpoint file: {e}")))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::checkpoint(format!("Failed to rename checkpoint file: {e}")))?;

        debug!(path = %self.path.display(), "Saved checkpoints");
        Ok(())
    }

    /// Get a scan's checkpoint
    pub async fn get(&self, scan: &str) -> Option<ScanCheckpoint> {
        self.document.read().await.get(scan).cloned()
    }

    /// Insert or replace a scan's checkpoint
    pub async fn put(&self, scan: &str, checkpoint: ScanCheckpoint) -> Result<()> {
        self.document.write().await.put(scan, checkpoint);

        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Remove a scan's checkpoint
    pub async fn remove(&self, scan: &str) -> Result<Option<ScanCheckpoint>> {
        let removed = self.document.write().await.remove(scan);

        if self.auto_save {
            self.save().await?;
        }
        Ok(removed)
    }

    /// Export checkpoints as a JSON string
    pub async fn to_json(&self) -> Result<String> {
        let document = self.document.read().await;
        Ok(serde_json::to_string(&*document)?)
    }

    /// Get the checkpoint file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for CheckpointStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            document: Arc::clone(&self.document),
            auto_save: self.auto_save,
        }
    }
}

fn parse_document(contents: &str) -> Result<CheckpointDocument> {
    serde_json::from_str(contents)
        .map_err(|e| Error::checkpoint(format!("Failed to parse checkpoint file: {e}")))
}
