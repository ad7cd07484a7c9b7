// ABOUTME: In-memory key-value store with versioned writes
// ABOUTME: Clones share one map, modelling several tabs on the same origin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CasOutcome, KeyValueStore, VersionedValue};
use crate::errors::AppResult;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, VersionedValue>,
    last_version: u64,
}

impl Inner {
    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }
}

/// In-memory store
///
/// Uses `Arc<RwLock<..>>` so every clone observes and contends on the same
/// entries, which is how tests reproduce concurrent tabs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<VersionedValue>> {
        Ok(self.inner.read().await.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let version = inner.next_version();
        inner
            .entries
            .insert(key.to_owned(), VersionedValue { value, version });
        drop(inner);
        Ok(version)
    }

    async fn remove(&self, key: &str) -> AppResult<bool> {
        Ok(self.inner.write().await.entries.remove(key).is_some())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<u64>,
        value: String,
    ) -> AppResult<CasOutcome> {
        let mut inner = self.inner.write().await;
        let current = inner.entries.get(key).map(|entry| entry.version);
        if current != expected {
            drop(inner);
            return Ok(CasOutcome::Conflict { current });
        }
        let version = inner.next_version();
        inner
            .entries
            .insert(key.to_owned(), VersionedValue { value, version });
        drop(inner);
        Ok(CasOutcome::Applied { version })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
