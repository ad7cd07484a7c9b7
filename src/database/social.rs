// ABOUTME: Friend-relationship graph over the account directory
// ABOUTME: Requests, responses, and lookups that always write both endpoints in one blob write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::instrument;

use super::directory::{AccountDirectory, UserTable};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::user::{insert_unique, remove_all};
use crate::models::{FriendResponse, Relationship, RequestOutcome, User, UserId};

/// Friend-relationship graph
///
/// Every mutation edits both endpoints inside one directory update, so for
/// any pair `A ∈ B.friends ⟺ B ∈ A.friends` holds after each write.
#[derive(Clone)]
pub struct FriendGraph {
    directory: AccountDirectory,
}

/// Both endpoints of a pair, mutably borrowed from the table
fn pair_mut<'a>(
    table: &'a mut UserTable,
    first: &UserId,
    second: &UserId,
) -> AppResult<(&'a mut User, &'a mut User)> {
    if !table.contains_key(first) {
        return Err(AppError::user_not_found(first.as_str()));
    }
    if !table.contains_key(second) {
        return Err(AppError::user_not_found(second.as_str()));
    }
    let mut first_user = None;
    let mut second_user = None;
    for (id, user) in table.iter_mut() {
        if id == first {
            first_user = Some(user);
        } else if id == second {
            second_user = Some(user);
        }
    }
    first_user
        .zip(second_user)
        .ok_or_else(|| AppError::internal("relationship endpoints must be distinct"))
}

/// Make `a` and `b` friends and drop any request between them
fn befriend(a: &mut User, b: &mut User) {
    remove_all(&mut a.pending_requests, &b.id);
    remove_all(&mut a.sent_requests, &b.id);
    remove_all(&mut b.pending_requests, &a.id);
    remove_all(&mut b.sent_requests, &a.id);
    insert_unique(&mut a.friends, &b.id);
    insert_unique(&mut b.friends, &a.id);
}

impl FriendGraph {
    /// Create a graph over the directory's records
    #[must_use]
    pub const fn new(directory: AccountDirectory) -> Self {
        Self { directory }
    }

    /// Send a friend request from `from` to `to`
    ///
    /// A request to someone who already asked the sender is treated as an
    /// acceptance. Repeating an outstanding request changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a self-request and `UserNotFound` if either
    /// account is missing
    #[instrument(skip(self))]
    pub async fn request(&self, from: &UserId, to: &UserId) -> AppResult<RequestOutcome> {
        if from == to {
            return Err(AppError::invalid_input(
                "You cannot send a friend request to yourself",
            ));
        }
        let outcome = self
            .directory
            .table()
            .update(|table| {
                let (sender, target) = pair_mut(table, from, to)?;
                if sender.is_friend(to) && target.is_friend(from) {
                    return Ok(RequestOutcome::AlreadyFriends);
                }
                if sender.pending_requests.contains(to) || target.sent_requests.contains(from) {
                    befriend(sender, target);
                    return Ok(RequestOutcome::Accepted);
                }
                if sender.sent_requests.contains(to) {
                    // heal a half-written pair left by older data
                    insert_unique(&mut target.pending_requests, from);
                    return Ok(RequestOutcome::AlreadyPending);
                }
                sender.sent_requests.push(to.clone());
                insert_unique(&mut target.pending_requests, from);
                Ok(RequestOutcome::Sent)
            })
            .await?;
        AppLogger::log_social_event(from.as_str(), to.as_str(), &format!("request:{outcome:?}"));
        Ok(outcome)
    }

    /// Answer the request `requester` sent to `responder`
    ///
    /// Both request entries are removed whether or not they still exist; on
    /// accept each id is added to the other's friends. A rejection leaves no
    /// record, so the requester may ask again immediately.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if either account is missing
    #[instrument(skip(self))]
    pub async fn respond(
        &self,
        requester: &UserId,
        responder: &UserId,
        response: FriendResponse,
    ) -> AppResult<()> {
        if requester == responder {
            return Err(AppError::invalid_input(
                "You cannot answer your own friend request",
            ));
        }
        self.directory
            .table()
            .update(|table| {
                let (asking, answering) = pair_mut(table, requester, responder)?;
                remove_all(&mut answering.pending_requests, requester);
                remove_all(&mut asking.sent_requests, responder);
                if response == FriendResponse::Accept {
                    befriend(asking, answering);
                }
                Ok(())
            })
            .await?;
        AppLogger::log_social_event(requester.as_str(), responder.as_str(), response.as_str());
        Ok(())
    }

    /// End a friendship on both sides
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if either account is missing
    pub async fn unfriend(&self, user: &UserId, friend: &UserId) -> AppResult<bool> {
        if user == friend {
            return Ok(false);
        }
        let removed = self
            .directory
            .table()
            .update(|table| {
                let (a, b) = pair_mut(table, user, friend)?;
                let left = remove_all(&mut a.friends, friend);
                let right = remove_all(&mut b.friends, user);
                Ok(left || right)
            })
            .await?;
        if removed {
            AppLogger::log_social_event(user.as_str(), friend.as_str(), "unfriend");
        }
        Ok(removed)
    }

    /// Look up each id, silently dropping ids with no account
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub async fn resolve(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let table = self
            .directory
            .table()
            .get()
            .await?
            .map(|snapshot| snapshot.value)
            .unwrap_or_default();
        Ok(ids.iter().filter_map(|id| table.get(id).cloned()).collect())
    }

    async fn user(&self, id: &UserId) -> AppResult<User> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id.as_str()))
    }

    /// Confirmed friends of `id`
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the account is missing
    pub async fn friends(&self, id: &UserId) -> AppResult<Vec<User>> {
        let user = self.user(id).await?;
        self.resolve(&user.friends).await
    }

    /// Accounts waiting for `id` to answer
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the account is missing
    pub async fn incoming_requests(&self, id: &UserId) -> AppResult<Vec<User>> {
        let user = self.user(id).await?;
        self.resolve(&user.pending_requests).await
    }

    /// Accounts `id` is waiting on
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the account is missing
    pub async fn outgoing_requests(&self, id: &UserId) -> AppResult<Vec<User>> {
        let user = self.user(id).await?;
        self.resolve(&user.sent_requests).await
    }

    /// How `viewer` relates to `other`
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if `viewer` is missing
    pub async fn relationship(&self, viewer: &UserId, other: &UserId) -> AppResult<Relationship> {
        let viewer = self.user(viewer).await?;
        Ok(Relationship::between(&viewer, other))
    }
}
