// ABOUTME: Account models for the local directory
// ABOUTME: UserId, Handle validation, and the User record with its three relationship sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::handles;
use crate::errors::{AppError, AppResult};

/// Opaque account identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Borrow the identifier as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A validated, lower-cased public username
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Normalize and validate a handle
    ///
    /// Input is lower-cased first; the result must be 3-20 characters of
    /// `[a-z0-9_]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if the normalized handle breaks the rules
    pub fn parse(raw: &str) -> AppResult<Self> {
        let normalized = raw.trim().to_lowercase();
        let length = normalized.chars().count();
        if length < handles::MIN_LENGTH {
            return Err(AppError::invalid_handle(format!(
                "Handle must be at least {} characters",
                handles::MIN_LENGTH
            )));
        }
        if length > handles::MAX_LENGTH {
            return Err(AppError::invalid_handle(format!(
                "Handle must be at most {} characters",
                handles::MAX_LENGTH
            )));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        {
            return Err(AppError::invalid_handle(format!(
                "Handle contains an invalid character: '{bad}'"
            )));
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized handle
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Account record stored in the directory
///
/// `friends` must be mutually present on both endpoints; an id never sits in
/// `pending_requests` while also being a confirmed friend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    #[serde(rename = "uid")]
    pub id: UserId,
    /// Unique email address
    pub email: String,
    /// Claimed handle; empty until the username-setup step completes
    #[serde(rename = "username", default)]
    pub handle: String,
    /// Optional display name used by search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Confirmed friends
    #[serde(default)]
    pub friends: Vec<UserId>,
    /// Incoming friend requests
    #[serde(default)]
    pub pending_requests: Vec<UserId>,
    /// Outgoing friend requests
    #[serde(default)]
    pub sent_requests: Vec<UserId>,
}

impl User {
    /// Create a fresh account with no handle and empty relationship sets
    #[must_use]
    pub fn new(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            handle: String::new(),
            display_name: None,
            created_at: now,
            friends: Vec::new(),
            pending_requests: Vec::new(),
            sent_requests: Vec::new(),
        }
    }

    /// Whether the username-setup step is still outstanding
    #[must_use]
    pub fn needs_handle(&self) -> bool {
        self.handle.is_empty()
    }

    /// Whether `other` is a confirmed friend
    #[must_use]
    pub fn is_friend(&self, other: &UserId) -> bool {
        self.friends.contains(other)
    }

    /// Case-insensitive match of `query` against handle and display name
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.handle.to_lowercase().contains(&query)
            || self
                .display_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query))
    }
}

/// Insert `id` unless already present
pub fn insert_unique(set: &mut Vec<UserId>, id: &UserId) -> bool {
    if set.contains(id) {
        false
    } else {
        set.push(id.clone());
        true
    }
}

/// Remove every occurrence of `id`
pub fn remove_all(set: &mut Vec<UserId>, id: &UserId) -> bool {
    let before = set.len();
    set.retain(|existing| existing != id);
    set.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_handle_is_lowercased() {
        let handle = Handle::parse("Ninja1").unwrap();
        assert_eq!(handle.as_str(), "ninja1");
    }

    #[test]
    fn test_handle_length_bounds() {
        assert_eq!(Handle::parse("ab").unwrap_err().code, ErrorCode::InvalidHandle);
        assert!(Handle::parse("abc").is_ok());
        assert!(Handle::parse(&"a".repeat(20)).is_ok());
        assert_eq!(
            Handle::parse(&"a".repeat(21)).unwrap_err().code,
            ErrorCode::InvalidHandle
        );
    }

    #[test]
    fn test_handle_rejects_symbols() {
        assert!(Handle::parse("snack_king_9").is_ok());
        assert!(Handle::parse("snack-king").is_err());
        assert!(Handle::parse("snack king").is_err());
        assert!(Handle::parse("café").is_err());
    }

    #[test]
    fn test_matches_query_checks_display_name() {
        let mut user = User::new("a@x.com", Utc::now());
        user.handle = "ninja1".to_owned();
        user.display_name = Some("Protein Queen".to_owned());
        assert!(user.matches_query("NIN"));
        assert!(user.matches_query("queen"));
        assert!(!user.matches_query("kale"));
    }

    #[test]
    fn test_user_serializes_with_storage_field_names() {
        let user = User::new("a@x.com", Utc::now());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("uid").is_some());
        assert!(json.get("username").is_some());
        assert!(json.get("pendingRequests").is_some());
        assert!(json.get("sentRequests").is_some());
    }
}
