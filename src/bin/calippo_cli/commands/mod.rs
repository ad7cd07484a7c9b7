// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for calippo-cli
// ABOUTME: Provides account, friend, and meal commands

pub mod account;
pub mod meals;
pub mod social;

use anyhow::{anyhow, Result};
use calippo::context::AppContext;
use calippo::models::User;

/// Signed-in account or a readable error
pub async fn current_user(ctx: &AppContext) -> Result<User> {
    ctx.session
        .current()
        .await?
        .ok_or_else(|| anyhow!("Not signed in. Run `calippo-cli account login --email ...` first"))
}

/// Account holding `handle` or a readable error
pub async fn user_by_handle(ctx: &AppContext, handle: &str) -> Result<User> {
    ctx.directory
        .find_by_handle(handle)
        .await?
        .ok_or_else(|| anyhow!("No account with handle '{handle}'"))
}

/// One-line rendering of an account
pub fn describe(user: &User) -> String {
    let handle = if user.handle.is_empty() {
        "(no handle)"
    } else {
        user.handle.as_str()
    };
    match &user.display_name {
        Some(name) => format!("@{handle} ({name}) <{}>", user.email),
        None => format!("@{handle} <{}>", user.email),
    }
}
