// ABOUTME: Key-value storage abstraction standing in for per-origin browser storage
// ABOUTME: Pluggable backends (memory, JSON file) with versioned compare-and-swap writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Key-Value Store Adapter
//!
//! Everything Calippo persists is a whole JSON value under a fixed logical
//! key. Backends implement [`KeyValueStore`]: plain `get`/`set`/`remove`
//! plus a versioned [`KeyValueStore::compare_and_swap`] so read-modify-write
//! cycles from several handles (several tabs on one origin) never silently
//! lose an update.
//!
//! ```rust,no_run
//! use calippo::storage::{memory::MemoryStore, CasOutcome, KeyValueStore};
//! # async fn example() -> Result<(), calippo::errors::AppError> {
//! let store = MemoryStore::new();
//! let version = store.set("theme", "\"dark\"".to_owned()).await?;
//! match store.compare_and_swap("theme", Some(version), "\"light\"".to_owned()).await? {
//!     CasOutcome::Applied { version } => println!("now at version {version}"),
//!     CasOutcome::Conflict { current } => println!("lost the race, current {current:?}"),
//! }
//! # Ok(())
//! # }
//! ```

/// Store factory for configuration-based backend selection
pub mod factory;
/// JSON document store on disk
pub mod file;
/// Typed JSON encode/decode at the adapter boundary
pub mod json;
/// In-memory store
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::storage_keys;
use crate::errors::AppResult;
use crate::models::UserId;

/// A stored value with the version of its last write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// Raw JSON text
    pub value: String,
    /// Store-wide monotonically increasing write version
    pub version: u64,
}

/// Result of a compare-and-swap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The write happened
    Applied {
        /// Version assigned to the new value
        version: u64,
    },
    /// Another writer got there first
    Conflict {
        /// Version currently stored, `None` if the key is absent
        current: Option<u64>,
    },
}

impl CasOutcome {
    /// Whether the write happened
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Key-value storage backend
///
/// Versions come from one counter per store so a key that is removed and
/// written again never reuses an old version.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    async fn get(&self, key: &str) -> AppResult<Option<VersionedValue>>;

    /// Unconditionally write `value` under `key`, returning the new version
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    async fn set(&self, key: &str, value: String) -> AppResult<u64>;

    /// Delete `key`, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    async fn remove(&self, key: &str) -> AppResult<bool>;

    /// Write `value` only if the stored version equals `expected`
    ///
    /// `expected = None` requires the key to be absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or written; a lost
    /// race is reported as [`CasOutcome::Conflict`], not as an error
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<u64>,
        value: String,
    ) -> AppResult<CasOutcome>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Logical storage keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Account directory blob
    Users,
    /// Current session pointer
    CurrentUser,
    /// Scan history of one user
    History(UserId),
    /// Progression record of one user
    Stats(UserId),
    /// Daily calorie goal
    DailyGoal,
    /// Theme preference
    Theme,
}

impl StorageKey {
    /// Concrete key string
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Users => storage_keys::USERS.to_owned(),
            Self::CurrentUser => storage_keys::CURRENT_USER.to_owned(),
            Self::History(user) => format!("{}:{user}", storage_keys::HISTORY_PREFIX),
            Self::Stats(user) => format!("{}:{user}", storage_keys::STATS_PREFIX),
            Self::DailyGoal => storage_keys::DAILY_GOAL.to_owned(),
            Self::Theme => storage_keys::THEME.to_owned(),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}
