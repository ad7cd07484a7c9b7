// ABOUTME: Per-user scan history store
// ABOUTME: Append, list most-recent-first, delete, clear, daily totals, and comparisons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::repository::DocumentRepository;
use crate::errors::AppResult;
use crate::models::{HistoryEntry, MacroComparison, MacroTotals, NutritionRecord, UserId};
use crate::storage::factory::SharedStore;
use crate::storage::StorageKey;

/// Stored history value, in insertion order
pub type HistoryLog = Vec<HistoryEntry>;

/// Scan history for every user
#[derive(Clone)]
pub struct HistoryStore {
    store: SharedStore,
    max_attempts: u32,
}

impl HistoryStore {
    /// Create a history store over `store`
    #[must_use]
    pub fn new(store: SharedStore, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts,
        }
    }

    fn log(&self, user: &UserId) -> DocumentRepository<HistoryLog> {
        DocumentRepository::new(
            self.store.clone(),
            StorageKey::History(user.clone()).as_key(),
            self.max_attempts,
        )
    }

    async fn entries(&self, user: &UserId) -> AppResult<HistoryLog> {
        Ok(self
            .log(user)
            .get()
            .await?
            .map(|snapshot| snapshot.value)
            .unwrap_or_default())
    }

    /// Append a new entry and return it with its length-after-append
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written
    pub async fn append(
        &self,
        user: &UserId,
        record: NutritionRecord,
        image: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<(HistoryEntry, usize)> {
        let entry = HistoryEntry::new(record, image, at);
        let appended = self
            .log(user)
            .update(|log| {
                log.push(entry.clone());
                Ok(log.len())
            })
            .await?;
        debug!(user = %user, entry = %entry.id, len = appended, "History entry appended");
        Ok((entry, appended))
    }

    /// Entries most-recent-first
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    pub async fn list(&self, user: &UserId) -> AppResult<Vec<HistoryEntry>> {
        let mut entries = self.entries(user).await?;
        entries.reverse();
        Ok(entries)
    }

    /// One entry by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    pub async fn get(&self, user: &UserId, entry_id: &str) -> AppResult<Option<HistoryEntry>> {
        Ok(self
            .entries(user)
            .await?
            .into_iter()
            .find(|entry| entry.id == entry_id))
    }

    /// Number of recorded entries
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    pub async fn len(&self, user: &UserId) -> AppResult<usize> {
        Ok(self.entries(user).await?.len())
    }

    /// Delete one entry, returning the remaining length if it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written
    pub async fn delete(&self, user: &UserId, entry_id: &str) -> AppResult<Option<usize>> {
        self.log(user)
            .update(|log| {
                let before = log.len();
                log.retain(|entry| entry.id != entry_id);
                Ok((log.len() != before).then_some(log.len()))
            })
            .await
    }

    /// Delete every entry, returning how many were removed
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written
    pub async fn clear(&self, user: &UserId) -> AppResult<usize> {
        self.log(user)
            .update(|log| {
                let removed = log.len();
                log.clear();
                Ok(removed)
            })
            .await
    }

    /// Summed macros over entries captured on `day` (UTC)
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    pub async fn daily_totals(&self, user: &UserId, day: NaiveDate) -> AppResult<MacroTotals> {
        let entries = self.entries(user).await?;
        Ok(MacroTotals::from_entries(
            entries.iter().filter(|entry| entry.day() == day),
        ))
    }

    /// Side-by-side macros for the selected entries, in selection order
    ///
    /// Unknown identifiers are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    pub async fn compare(&self, user: &UserId, entry_ids: &[String]) -> AppResult<MacroComparison> {
        let entries = self.entries(user).await?;
        let selected: Vec<&HistoryEntry> = entry_ids
            .iter()
            .filter_map(|id| entries.iter().find(|entry| entry.id == *id))
            .collect();
        Ok(MacroComparison::from_entries(&selected))
    }
}
