// ABOUTME: Typed repository over one stored JSON document
// ABOUTME: Read-mutate-compare-and-swap updates with bounded retries on conflict
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::storage::factory::SharedStore;
use crate::storage::{json, CasOutcome};

/// A decoded value together with the version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// Decoded value
    pub value: T,
    /// Version to pass back to `compare_and_swap`
    pub version: u64,
}

/// Repository for one logical key holding a whole JSON value
///
/// All writers of a key go through [`DocumentRepository::update`], so a
/// mutation that touches several records inside the value (both sides of a
/// friendship, a handle check and its claim) lands as one versioned write.
pub struct DocumentRepository<T> {
    store: SharedStore,
    key: String,
    max_attempts: u32,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            max_attempts: self.max_attempts,
            _value: PhantomData,
        }
    }
}

impl<T> DocumentRepository<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Create a repository for `key`; `max_attempts` is clamped to at least 1
    pub fn new(store: SharedStore, key: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            store,
            key: key.into(),
            max_attempts: max_attempts.max(1),
            _value: PhantomData,
        }
    }

    /// Storage key of this repository
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the current value
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value does not decode
    pub async fn get(&self) -> AppResult<Option<Snapshot<T>>> {
        let Some(stored) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        let value = json::decode(&self.key, &stored.value)?;
        Ok(Some(Snapshot {
            value,
            version: stored.version,
        }))
    }

    /// Unconditionally overwrite the value
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails
    pub async fn put(&self, value: &T) -> AppResult<u64> {
        let raw = json::encode(&self.key, value)?;
        self.store.set(&self.key, raw).await
    }

    /// Write only if the stored version is still `expected`
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails
    pub async fn compare_and_swap(&self, expected: Option<u64>, value: &T) -> AppResult<CasOutcome> {
        let raw = json::encode(&self.key, value)?;
        self.store.compare_and_swap(&self.key, expected, raw).await
    }

    /// Delete the value
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails
    pub async fn remove(&self) -> AppResult<bool> {
        self.store.remove(&self.key).await
    }

    /// Read-modify-write with optimistic concurrency
    ///
    /// `mutate` runs against a fresh copy on every attempt, so it must be
    /// free of side effects outside the value. An `Err` from `mutate`
    /// aborts without writing. When the mutated value encodes identically
    /// to what was read, nothing is written and the version stays put.
    ///
    /// # Errors
    ///
    /// Returns the error from `mutate`, a storage error, or
    /// `ConcurrentModification` once every attempt lost its race
    pub async fn update<R, F>(&self, mut mutate: F) -> AppResult<R>
    where
        T: Default,
        F: FnMut(&mut T) -> AppResult<R> + Send,
        R: Send,
    {
        for attempt in 1..=self.max_attempts {
            let (mut value, expected, before) = match self.store.get(&self.key).await? {
                Some(stored) => (
                    json::decode(&self.key, &stored.value)?,
                    Some(stored.version),
                    stored.value,
                ),
                None => {
                    let value = T::default();
                    let before = json::encode(&self.key, &value)?;
                    (value, None, before)
                }
            };
            let result = mutate(&mut value)?;
            let raw = json::encode(&self.key, &value)?;
            if raw == before {
                return Ok(result);
            }
            match self.store.compare_and_swap(&self.key, expected, raw).await? {
                CasOutcome::Applied { .. } => return Ok(result),
                CasOutcome::Conflict { .. } => {
                    AppLogger::log_storage_conflict(&self.key, attempt, self.max_attempts);
                }
            }
        }
        Err(AppError::concurrent_modification(
            &self.key,
            self.max_attempts,
        ))
    }
}
