// ABOUTME: Store factory for configuration-based backend selection
// ABOUTME: Builds the memory or file backend behind a shared trait object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::info;

use super::{file::FileStore, memory::MemoryStore, KeyValueStore};
use crate::config::environment::{StorageBackend, StorageConfig};
use crate::errors::AppResult;

/// Shared handle to the configured backend
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Create the backend named by `config`
///
/// # Errors
///
/// Returns an error if the file backend cannot prepare its data directory
pub async fn create_store(config: &StorageConfig) -> AppResult<SharedStore> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Initializing in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::File => {
            info!(
                data_dir = %config.data_dir.display(),
                "Initializing file store"
            );
            Ok(Arc::new(FileStore::open(&config.data_dir).await?))
        }
    }
}
