// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Account commands for calippo-cli
// ABOUTME: Sign-up, sign-in, handle claims, display names, and search

use anyhow::Result;
use calippo::context::AppContext;
use calippo::models::Relationship;

use super::{current_user, describe};

/// Create an account and sign in
pub async fn signup(ctx: &AppContext, email: &str) -> Result<()> {
    let user = ctx.session.sign_up(email).await?;
    println!("Created account {}", user.id);
    println!("Pick a handle next: calippo-cli account handle <name>");
    Ok(())
}

/// Sign in to an existing account
pub async fn login(ctx: &AppContext, email: &str) -> Result<()> {
    let user = ctx.session.sign_in(email).await?;
    println!("Signed in as {}", describe(&user));
    if user.needs_handle() {
        println!("This account has no handle yet");
    }
    Ok(())
}

/// Sign out
pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.clear().await?;
    println!("Signed out");
    Ok(())
}

/// Show the signed-in account
pub async fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.session.current().await? {
        Some(user) => {
            println!("{}", describe(&user));
            println!(
                "  friends: {}  incoming: {}  outgoing: {}",
                user.friends.len(),
                user.pending_requests.len(),
                user.sent_requests.len()
            );
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

/// Claim a handle for the signed-in account
pub async fn claim_handle(ctx: &AppContext, handle: &str) -> Result<()> {
    let user = current_user(ctx).await?;
    let updated = ctx.directory.claim_handle(&user.id, handle).await?;
    println!("Handle set: @{}", updated.handle);
    Ok(())
}

/// Set or clear the display name
pub async fn display_name(ctx: &AppContext, name: Option<&str>) -> Result<()> {
    let user = current_user(ctx).await?;
    let updated = ctx.directory.set_display_name(&user.id, name).await?;
    println!("{}", describe(&updated));
    Ok(())
}

/// Search other accounts
pub async fn search(ctx: &AppContext, query: &str) -> Result<()> {
    let user = current_user(ctx).await?;
    let results = ctx.directory.search(query, &user.id).await?;
    if results.is_empty() {
        println!("No matches");
        return Ok(());
    }
    for other in results {
        let marker = match Relationship::between(&user, &other.id) {
            Relationship::Friends => " [friend]",
            Relationship::RequestSent => " [requested]",
            Relationship::RequestReceived => " [wants to be friends]",
            Relationship::Yourself | Relationship::None => "",
        };
        println!("{}{marker}", describe(&other));
    }
    Ok(())
}
