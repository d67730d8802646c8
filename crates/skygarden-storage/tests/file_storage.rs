//! Integration tests for the file-backed store.
//!
//! Each test gets its own temporary directory, so they run in parallel
//! without stepping on each other.

use std::sync::Arc;

use skygarden_storage::{FileStorage, ScopedStorage, Storage, StorageError};

async fn open_temp() -> (tempfile::TempDir, FileStorage) {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = FileStorage::open(dir.path()).await.expect("should open");
    (dir, storage)
}

#[tokio::test]
async fn test_open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let storage = FileStorage::open(&nested).await.unwrap();

    assert!(nested.is_dir());
    assert_eq!(storage.root(), nested.as_path());
}

#[tokio::test]
async fn test_set_then_get_round_trips_through_disk() {
    let (dir, storage) = open_temp().await;

    storage.set("identity", r#"{"id":"mock-1"}"#).await.unwrap();

    assert!(dir.path().join("identity.json").is_file());
    assert_eq!(
        storage.get("identity").await.unwrap().as_deref(),
        Some(r#"{"id":"mock-1"}"#)
    );
}

#[tokio::test]
async fn test_value_survives_reopen() {
    let (dir, storage) = open_temp().await;
    storage.set("identity", "persisted").await.unwrap();
    drop(storage);

    let reopened = FileStorage::open(dir.path()).await.unwrap();

    assert_eq!(
        reopened.get("identity").await.unwrap().as_deref(),
        Some("persisted")
    );
}

#[tokio::test]
async fn test_set_leaves_no_temp_file() {
    let (dir, storage) = open_temp().await;

    storage.set("identity", "one").await.unwrap();
    storage.set("identity", "two").await.unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["identity.json".to_string()]);
}

#[tokio::test]
async fn test_remove_deletes_file_and_tolerates_absence() {
    let (dir, storage) = open_temp().await;
    storage.set("identity", "x").await.unwrap();

    storage.remove("identity").await.unwrap();
    storage.remove("identity").await.unwrap();

    assert!(!dir.path().join("identity.json").exists());
    assert_eq!(storage.get("identity").await.unwrap(), None);
}

#[tokio::test]
async fn test_traversal_key_is_rejected_before_touching_disk() {
    let (_dir, storage) = open_temp().await;

    let result = storage.set("../outside", "x").await;

    assert!(matches!(result, Err(StorageError::InvalidKey(_))));
}

#[tokio::test]
async fn test_scoped_file_storage_writes_prefixed_files() {
    let (dir, storage) = open_temp().await;
    let scoped = ScopedStorage::new(Arc::new(storage), "browser-7").unwrap();

    scoped.set("identity", "x").await.unwrap();

    assert!(dir.path().join("browser-7.identity.json").is_file());
}
