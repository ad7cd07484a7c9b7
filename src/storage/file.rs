// ABOUTME: Durable key-value store persisted as a single JSON document on disk
// ABOUTME: Writes go to a unique temp file renamed into place under an exclusive file lock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError};

use async_trait::async_trait;
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use super::{CasOutcome, KeyValueStore, VersionedValue};
use crate::constants::storage_keys::{STORE_FILE_NAME, STORE_LOCK_FILE_NAME};
use crate::errors::{AppResult, StorageError};

/// In-process locks keyed by canonical store path
static PATH_LOCKS: OnceLock<std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    OnceLock::new();

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn process_lock(path: &Path) -> Arc<Mutex<()>> {
    let registry = PATH_LOCKS.get_or_init(Default::default);
    let mut locks = registry.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(path.to_path_buf()).or_default())
}

/// Held for a whole load-compare-persist cycle
///
/// The OS lock is released when the file closes, before the in-process
/// guard is dropped.
struct StoreGuard {
    _file: std::fs::File,
    _local: OwnedMutexGuard<()>,
}

/// On-disk layout of the store
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    last_version: u64,
    entries: BTreeMap<String, VersionedValue>,
}

impl StoreDocument {
    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }
}

/// JSON-file store
///
/// Every operation reads the whole document under an exclusive lock on a
/// sidecar file, so handles opened on the same directory (in this process
/// or another) serialize their read-modify-write cycles and observe each
/// other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Open (or lazily create) the store document inside `data_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub async fn open(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .await
            .map_err(|source| StorageError::Io {
                path: data_dir.display().to_string(),
                source,
            })?;
        let data_dir = fs::canonicalize(data_dir)
            .await
            .map_err(|source| StorageError::Io {
                path: data_dir.display().to_string(),
                source,
            })?;
        let path = data_dir.join(STORE_FILE_NAME);
        debug!(path = %path.display(), "Opened file store");
        Ok(Self {
            lock: process_lock(&path),
            lock_path: data_dir.join(STORE_LOCK_FILE_NAME),
            path,
        })
    }

    /// Location of the store document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn acquire(&self) -> AppResult<StoreGuard> {
        let local = Arc::clone(&self.lock).lock_owned().await;
        let lock_path = self.lock_path.clone();
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<std::fs::File> {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(file)
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|locked| locked)
        .map_err(|source| StorageError::Io {
            path: self.lock_path.display().to_string(),
            source,
        })?;
        Ok(StoreGuard {
            _file: file,
            _local: local,
        })
    }

    async fn load(&self) -> AppResult<StoreDocument> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoreDocument::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::Corrupt(format!("{}: {e}", self.path.display())).into()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(self.io_error(e).into()),
        }
    }

    async fn persist(&self, document: &StoreDocument) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|source| {
            StorageError::Serialization {
                key: STORE_FILE_NAME.to_owned(),
                source,
            }
        })?;
        let temp = self.path.with_file_name(format!(
            "{STORE_FILE_NAME}.{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = fs::write(&temp, bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(self.io_error(e).into());
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            warn!(temp = %temp.display(), error = %e, "Failed to move store document into place");
            let _ = fs::remove_file(&temp).await;
            return Err(self.io_error(e).into());
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<VersionedValue>> {
        let _guard = self.acquire().await?;
        let mut document = self.load().await?;
        Ok(document.entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> AppResult<u64> {
        let _guard = self.acquire().await?;
        let mut document = self.load().await?;
        let version = document.next_version();
        document
            .entries
            .insert(key.to_owned(), VersionedValue { value, version });
        self.persist(&document).await?;
        Ok(version)
    }

    async fn remove(&self, key: &str) -> AppResult<bool> {
        let _guard = self.acquire().await?;
        let mut document = self.load().await?;
        if document.entries.remove(key).is_none() {
            return Ok(false);
        }
        self.persist(&document).await?;
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<u64>,
        value: String,
    ) -> AppResult<CasOutcome> {
        let _guard = self.acquire().await?;
        let mut document = self.load().await?;
        let current = document.entries.get(key).map(|entry| entry.version);
        if current != expected {
            return Ok(CasOutcome::Conflict { current });
        }
        let version = document.next_version();
        document
            .entries
            .insert(key.to_owned(), VersionedValue { value, version });
        self.persist(&document).await?;
        Ok(CasOutcome::Applied { version })
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
