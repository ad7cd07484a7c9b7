// ABOUTME: Integration tests for the key-value storage backends
// ABOUTME: Covers versioned compare-and-swap, persistence, and corrupt documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use calippo::config::{StorageBackend, StorageConfig};
use calippo::database::DocumentRepository;
use calippo::errors::ErrorCode;
use calippo::models::UserId;
use calippo::storage::factory::{create_store, SharedStore};
use calippo::storage::file::FileStore;
use calippo::storage::memory::MemoryStore;
use calippo::storage::{CasOutcome, KeyValueStore, StorageKey};
use tempfile::TempDir;

async fn exercise_cas(store: &dyn KeyValueStore) {
    let created = store
        .compare_and_swap("k", None, "one".to_owned())
        .await
        .unwrap();
    let CasOutcome::Applied { version: v1 } = created else {
        panic!("first write should apply: {created:?}");
    };

    // absent-only write on an existing key loses
    let again = store
        .compare_and_swap("k", None, "other".to_owned())
        .await
        .unwrap();
    assert_eq!(again, CasOutcome::Conflict { current: Some(v1) });

    let stale = store
        .compare_and_swap("k", Some(v1 + 100), "other".to_owned())
        .await
        .unwrap();
    assert!(!stale.is_applied());

    let updated = store
        .compare_and_swap("k", Some(v1), "two".to_owned())
        .await
        .unwrap();
    let CasOutcome::Applied { version: v2 } = updated else {
        panic!("matching write should apply: {updated:?}");
    };
    assert!(v2 > v1);

    let value = store.get("k").await.unwrap().unwrap();
    assert_eq!(value.value, "two");
    assert_eq!(value.version, v2);

    // versions never repeat across a remove
    assert!(store.remove("k").await.unwrap());
    assert!(!store.remove("k").await.unwrap());
    assert!(store.get("k").await.unwrap().is_none());
    let gone = store
        .compare_and_swap("k", Some(v2), "three".to_owned())
        .await
        .unwrap();
    assert_eq!(gone, CasOutcome::Conflict { current: None });
    let v3 = store.set("k", "three".to_owned()).await.unwrap();
    assert!(v3 > v2);
}

#[tokio::test]
async fn test_memory_store_compare_and_swap() {
    let store = MemoryStore::new();
    exercise_cas(&store).await;
    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn test_memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let other_tab = store.clone();
    store.set("theme", "\"dark\"".to_owned()).await.unwrap();
    assert_eq!(
        other_tab.get("theme").await.unwrap().unwrap().value,
        "\"dark\""
    );
    assert_eq!(other_tab.len().await, 1);
}

#[tokio::test]
async fn test_file_store_compare_and_swap() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    exercise_cas(&store).await;
    assert_eq!(store.backend_name(), "file");
}

#[tokio::test]
async fn test_file_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let first = FileStore::open(dir.path()).await.unwrap();
    let version = first.set("calippo_daily_goal", "2000".to_owned()).await.unwrap();
    drop(first);

    let reopened = FileStore::open(dir.path()).await.unwrap();
    let value = reopened.get("calippo_daily_goal").await.unwrap().unwrap();
    assert_eq!(value.value, "2000");
    assert_eq!(value.version, version);

    // the counter survives too
    let next = reopened.set("theme", "\"light\"".to_owned()).await.unwrap();
    assert!(next > version);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_store_handles_on_one_directory_never_lose_updates() {
    let dir = TempDir::new().unwrap();
    let first: SharedStore = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let second: SharedStore = Arc::new(FileStore::open(dir.path()).await.unwrap());

    let counter_on = |store: SharedStore| {
        tokio::spawn(async move {
            let counter = DocumentRepository::<u64>::new(store, "counter", 1000);
            for _ in 0..100 {
                counter
                    .update(|n| {
                        *n += 1;
                        Ok(())
                    })
                    .await
                    .unwrap();
            }
        })
    };
    let (a, b) = tokio::join!(counter_on(first.clone()), counter_on(second));
    a.unwrap();
    b.unwrap();

    let total = DocumentRepository::<u64>::new(first, "counter", 1)
        .get()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(total.value, 200);

    // no staging files left behind
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        let name = entry.file_name().to_string_lossy().into_owned();
        assert!(!name.ends_with(".tmp"), "leftover temp file {name}");
    }
}

#[tokio::test]
async fn test_file_store_reports_corrupt_document() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    tokio::fs::write(store.path(), b"{ not json").await.unwrap();

    let err = store.get("anything").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
}

#[tokio::test]
async fn test_file_store_empty_document_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    tokio::fs::write(store.path(), b"").await.unwrap();
    assert!(store.get("anything").await.unwrap().is_none());
}

#[tokio::test]
async fn test_factory_selects_backend() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::File,
        data_dir: dir.path().to_path_buf(),
        cas_max_retries: 4,
    };
    let store = create_store(&config).await.unwrap();
    assert_eq!(store.backend_name(), "file");

    let config = StorageConfig {
        backend: StorageBackend::Memory,
        ..config
    };
    assert_eq!(create_store(&config).await.unwrap().backend_name(), "memory");
}

#[test]
fn test_storage_keys() {
    let user = UserId::from("abc");
    assert_eq!(StorageKey::Users.as_key(), "calippo_db_users");
    assert_eq!(StorageKey::CurrentUser.as_key(), "calippo_current_user");
    assert_eq!(StorageKey::History(user.clone()).as_key(), "calippo_history:abc");
    assert_eq!(StorageKey::Stats(user).as_key(), "calippo_stats:abc");
    assert_eq!(StorageKey::DailyGoal.as_key(), "calippo_daily_goal");
    assert_eq!(StorageKey::Theme.as_key(), "theme");
}
