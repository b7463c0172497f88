//! Tests for CheckpointStore

use super::*;
use crate::error::Error;
use crate::feed::FeedKind;
use tempfile::tempdir;

fn checkpoint(token: &str, fetched: u64) -> ScanCheckpoint {
    ScanCheckpoint {
        kind: FeedKind::Query,
        continuation_token: Some(token.to_string()),
        items_fetched: fetched,
        exhausted: false,
    }
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_store_new() {
    let store = CheckpointStore::new("/tmp/checkpoints.json");
    assert!(!store.is_in_memory());
    assert_eq!(store.path().to_str().unwrap(), "/tmp/checkpoints.json");
}

#[test]
fn test_store_in_memory() {
    let store = CheckpointStore::in_memory();
    assert!(store.is_in_memory());
}

#[test]
fn test_from_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let store = CheckpointStore::from_file(dir.path().join("absent.json")).unwrap();
    assert!(!store.is_in_memory());
}

#[test]
fn test_from_corrupt_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = CheckpointStore::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::Checkpoint { .. }));
}

// ============================================================================
// Get/Put Tests
// ============================================================================

#[tokio::test]
async fn test_put_and_get() {
    let store = CheckpointStore::in_memory();
    assert!(store.get("users").await.is_none());

    store.put("users", checkpoint("c1", 10)).await.unwrap();
    store.put("users", checkpoint("c2", 20)).await.unwrap();

    assert_eq!(store.get("users").await, Some(checkpoint("c2", 20)));
}

#[tokio::test]
async fn test_remove() {
    let store = CheckpointStore::in_memory();
    store.put("users", checkpoint("c1", 1)).await.unwrap();

    let removed = store.remove("users").await.unwrap();
    assert_eq!(removed, Some(checkpoint("c1", 1)));
    assert!(store.get("users").await.is_none());
    assert!(store.remove("users").await.unwrap().is_none());
}

#[tokio::test]
async fn test_clones_share_document() {
    let store = CheckpointStore::in_memory();
    let clone = store.clone();

    clone.put("orders", checkpoint("c9", 9)).await.unwrap();
    assert_eq!(store.get("orders").await, Some(checkpoint("c9", 9)));
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_auto_save_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("checkpoints.json");

    let store = CheckpointStore::new(&path);
    store.put("users", checkpoint("c1", 3)).await.unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reopened = CheckpointStore::from_file(&path).unwrap();
    assert_eq!(reopened.get("users").await, Some(checkpoint("c1", 3)));
}

#[tokio::test]
async fn test_load_replaces_cached_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("checkpoints.json");

    let writer = CheckpointStore::new(&path);
    let reader = CheckpointStore::new(&path);
    writer.put("users", checkpoint("c5", 5)).await.unwrap();

    assert!(reader.get("users").await.is_none());
    reader.load().await.unwrap();
    assert_eq!(reader.get("users").await, Some(checkpoint("c5", 5)));
}

#[tokio::test]
async fn test_to_json() {
    let store = CheckpointStore::in_memory();
    store.put("users", checkpoint("c1", 1)).await.unwrap();

    let json = store.to_json().await.unwrap();
    assert!(json.contains("\"continuation_token\":\"c1\""));
}
