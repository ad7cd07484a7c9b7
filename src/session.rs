// ABOUTME: Session holder: the single "current user" pointer for this device
// ABOUTME: Stores only the identifier and always reads the account through the directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use crate::database::{AccountDirectory, DocumentRepository};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{User, UserId};
use crate::storage::factory::SharedStore;
use crate::storage::StorageKey;

/// Current-user pointer
///
/// Holding an identifier instead of a copy of the record means the
/// session can never show a stale account after a directory write.
#[derive(Clone)]
pub struct SessionHolder {
    pointer: DocumentRepository<UserId>,
    directory: AccountDirectory,
}

impl SessionHolder {
    /// Create a session holder over `store`
    #[must_use]
    pub fn new(store: SharedStore, directory: AccountDirectory, max_attempts: u32) -> Self {
        Self {
            pointer: DocumentRepository::new(store, StorageKey::CurrentUser.as_key(), max_attempts),
            directory,
        }
    }

    /// Identifier of the signed-in account, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer cannot be read
    pub async fn current_id(&self) -> AppResult<Option<UserId>> {
        Ok(self.pointer.get().await?.map(|snapshot| snapshot.value))
    }

    /// The signed-in account, read fresh from the directory
    ///
    /// A pointer to a deleted account yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer or directory cannot be read
    pub async fn current(&self) -> AppResult<Option<User>> {
        let Some(id) = self.current_id().await? else {
            return Ok(None);
        };
        self.directory.find_by_id(&id).await
    }

    /// The signed-in account, or `UserNotFound` when signed out
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if nobody is signed in
    pub async fn require_current(&self) -> AppResult<User> {
        self.current()
            .await?
            .ok_or_else(|| AppError::user_not_found("for the current session"))
    }

    /// Make `user` the current account
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer cannot be written
    pub async fn establish(&self, user: &User) -> AppResult<()> {
        self.pointer.put(&user.id).await?;
        AppLogger::log_account_event(user.id.as_str(), "session_established", true, None);
        Ok(())
    }

    /// Sign out
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer cannot be removed
    pub async fn clear(&self) -> AppResult<()> {
        if self.pointer.remove().await? {
            info!("Session cleared");
        }
        Ok(())
    }

    /// Create an account and sign it in
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` or `InvalidInput` from account creation
    #[instrument(skip(self))]
    pub async fn sign_up(&self, email: &str) -> AppResult<User> {
        let user = self.directory.create(email).await?;
        self.establish(&user).await?;
        Ok(user)
    }

    /// Sign in to an existing account by email
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no account uses `email`
    #[instrument(skip(self))]
    pub async fn sign_in(&self, email: &str) -> AppResult<User> {
        let Some(user) = self.directory.find_by_email(email).await? else {
            AppLogger::log_account_event("", "sign_in", false, Some("unknown email"));
            return Err(AppError::user_not_found(email.trim()));
        };
        self.establish(&user).await?;
        Ok(user)
    }

    /// Whether the signed-in account still has to claim a handle
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read
    pub async fn needs_handle(&self) -> AppResult<bool> {
        Ok(self.current().await?.is_some_and(|user| user.needs_handle()))
    }
}
