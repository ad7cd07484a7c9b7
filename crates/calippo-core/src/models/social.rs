// ABOUTME: Friend-graph value types
// ABOUTME: Request responses, request outcomes, and the relationship between two accounts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::{User, UserId};
use crate::errors::AppError;

/// Answer to an incoming friend request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FriendResponse {
    /// Become friends
    Accept,
    /// Drop the request without a trace
    Reject,
}

impl Display for FriendResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FriendResponse {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            _ => Err(AppError::invalid_input(format!(
                "Invalid friend response: {s}"
            ))),
        }
    }
}

impl FriendResponse {
    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

/// What a friend request ended up doing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// A new pending request was recorded on both sides
    Sent,
    /// The same request was already outstanding
    AlreadyPending,
    /// The two accounts are already friends
    AlreadyFriends,
    /// The target had already asked the sender, so they became friends
    Accepted,
}

/// How one account relates to another, from the first account's view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// Same account
    Yourself,
    /// Confirmed friends
    Friends,
    /// Waiting for the other account to answer
    RequestSent,
    /// The other account is waiting for an answer
    RequestReceived,
    /// No relationship
    None,
}

impl Relationship {
    /// Relationship of `viewer` to `other`
    #[must_use]
    pub fn between(viewer: &User, other: &UserId) -> Self {
        if viewer.id == *other {
            Self::Yourself
        } else if viewer.friends.contains(other) {
            Self::Friends
        } else if viewer.sent_requests.contains(other) {
            Self::RequestSent
        } else if viewer.pending_requests.contains(other) {
            Self::RequestReceived
        } else {
            Self::None
        }
    }
}
