// ABOUTME: Account directory mapping user identifiers to account records
// ABOUTME: Email uniqueness, handle claims, search, and deletion over one versioned blob
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, instrument};

use super::repository::DocumentRepository;
use crate::constants::search::MAX_RESULTS;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::user::remove_all;
use crate::models::{Handle, User, UserId};
use crate::storage::factory::SharedStore;
use crate::storage::StorageKey;

/// Stored directory value: every account keyed by identifier
pub type UserTable = BTreeMap<UserId, User>;

/// Account directory
#[derive(Clone)]
pub struct AccountDirectory {
    users: DocumentRepository<UserTable>,
}

impl AccountDirectory {
    /// Create a directory over `store`
    #[must_use]
    pub fn new(store: SharedStore, max_attempts: u32) -> Self {
        Self {
            users: DocumentRepository::new(store, StorageKey::Users.as_key(), max_attempts),
        }
    }

    /// Repository holding the whole table, shared with the friend graph
    pub(crate) const fn table(&self) -> &DocumentRepository<UserTable> {
        &self.users
    }

    async fn snapshot(&self) -> AppResult<UserTable> {
        Ok(self
            .users
            .get()
            .await?
            .map(|snapshot| snapshot.value)
            .unwrap_or_default())
    }

    /// Create an account for `email` with an empty handle
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank email and `DuplicateEmail` if the
    /// email is already registered
    #[instrument(skip(self))]
    pub async fn create(&self, email: &str) -> AppResult<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::invalid_input("Email must not be empty"));
        }
        let created = self
            .users
            .update(|table| {
                if table.values().any(|user| user.email == email) {
                    return Err(AppError::duplicate_email(email));
                }
                let user = User::new(email, Utc::now());
                table.insert(user.id.clone(), user.clone());
                Ok(user)
            })
            .await;
        match &created {
            Ok(user) => AppLogger::log_account_event(user.id.as_str(), "create", true, None),
            Err(e) => AppLogger::log_account_event("", "create", false, Some(&e.message)),
        }
        created
    }

    /// Look up an account by email (trimmed, exact match)
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim();
        Ok(self
            .snapshot()
            .await?
            .into_values()
            .find(|user| user.email == email))
    }

    /// Look up an account by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.snapshot().await?.remove(id))
    }

    /// Look up an account by handle, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn find_by_handle(&self, handle: &str) -> AppResult<Option<User>> {
        let wanted = handle.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .snapshot()
            .await?
            .into_values()
            .find(|user| user.handle.to_lowercase() == wanted))
    }

    /// Every account, ordered by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.snapshot().await?.into_values().collect())
    }

    /// Whether no account holds `handle`, compared case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn is_handle_available(&self, handle: &str) -> AppResult<bool> {
        let wanted = handle.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(false);
        }
        Ok(!self
            .snapshot()
            .await?
            .values()
            .any(|user| user.handle.to_lowercase() == wanted))
    }

    /// Claim `handle` for `user_id`
    ///
    /// Availability is checked in the same write as the claim. Re-claiming
    /// the handle the user already holds succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle`, `UserNotFound`, or `HandleTaken`
    #[instrument(skip(self))]
    pub async fn claim_handle(&self, user_id: &UserId, handle: &str) -> AppResult<User> {
        let handle = Handle::parse(handle)?;
        let claimed = self
            .users
            .update(|table| {
                if !table.contains_key(user_id) {
                    return Err(AppError::user_not_found(user_id.as_str()));
                }
                let taken = table.values().any(|other| {
                    other.id != *user_id && other.handle.to_lowercase() == handle.as_str()
                });
                if taken {
                    return Err(AppError::handle_taken(handle.as_str()));
                }
                let user = table
                    .get_mut(user_id)
                    .ok_or_else(|| AppError::user_not_found(user_id.as_str()))?;
                user.handle = handle.as_str().to_owned();
                Ok(user.clone())
            })
            .await;
        AppLogger::log_account_event(
            user_id.as_str(),
            "claim_handle",
            claimed.is_ok(),
            Some(handle.as_str()),
        );
        claimed
    }

    /// Set or clear the display name used by search
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the account does not exist
    pub async fn set_display_name(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
    ) -> AppResult<User> {
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        self.users
            .update(|table| {
                let user = table
                    .get_mut(user_id)
                    .ok_or_else(|| AppError::user_not_found(user_id.as_str()))?;
                user.display_name.clone_from(&display_name);
                Ok(user.clone())
            })
            .await
    }

    /// Accounts whose handle or display name contains `query`
    ///
    /// Case-insensitive, excludes `requester`, at most five results. A blank
    /// query matches nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn search(&self, query: &str, requester: &UserId) -> AppResult<Vec<User>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let results: Vec<User> = self
            .snapshot()
            .await?
            .into_values()
            .filter(|user| user.id != *requester && user.matches_query(query))
            .take(MAX_RESULTS)
            .collect();
        debug!(query, results = results.len(), "Directory search");
        Ok(results)
    }

    /// Remove an account and scrub its identifier from every relationship set
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be written
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &UserId) -> AppResult<bool> {
        let removed = self
            .users
            .update(|table| {
                if table.remove(user_id).is_none() {
                    return Ok(false);
                }
                for other in table.values_mut() {
                    remove_all(&mut other.friends, user_id);
                    remove_all(&mut other.pending_requests, user_id);
                    remove_all(&mut other.sent_requests, user_id);
                }
                Ok(true)
            })
            .await?;
        if removed {
            AppLogger::log_account_event(user_id.as_str(), "delete", true, None);
        }
        Ok(removed)
    }
}
