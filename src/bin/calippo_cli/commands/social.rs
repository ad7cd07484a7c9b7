// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Friend commands for calippo-cli
// ABOUTME: Lists friends and requests, sends and answers requests

use anyhow::Result;
use calippo::context::AppContext;
use calippo::models::{FriendResponse, RequestOutcome};

use super::{current_user, describe, user_by_handle};

/// List friends
pub async fn list(ctx: &AppContext) -> Result<()> {
    let user = current_user(ctx).await?;
    let friends = ctx.social.friends(&user.id).await?;
    if friends.is_empty() {
        println!("No friends yet");
    }
    for friend in friends {
        println!("{}", describe(&friend));
    }
    Ok(())
}

/// List incoming and outgoing requests
pub async fn requests(ctx: &AppContext) -> Result<()> {
    let user = current_user(ctx).await?;
    println!("Incoming:");
    for other in ctx.social.incoming_requests(&user.id).await? {
        println!("  {}", describe(&other));
    }
    println!("Outgoing:");
    for other in ctx.social.outgoing_requests(&user.id).await? {
        println!("  {}", describe(&other));
    }
    Ok(())
}

/// Send a friend request
pub async fn request(ctx: &AppContext, handle: &str) -> Result<()> {
    let user = current_user(ctx).await?;
    let target = user_by_handle(ctx, handle).await?;
    let outcome = ctx.social.request(&user.id, &target.id).await?;
    let message = match outcome {
        RequestOutcome::Sent => "Request sent",
        RequestOutcome::AlreadyPending => "Request already pending",
        RequestOutcome::AlreadyFriends => "Already friends",
        RequestOutcome::Accepted => "They had already asked you: you are now friends",
    };
    println!("@{}: {message}", target.handle);
    Ok(())
}

/// Accept or reject an incoming request
pub async fn respond(ctx: &AppContext, handle: &str, response: FriendResponse) -> Result<()> {
    let user = current_user(ctx).await?;
    let requester = user_by_handle(ctx, handle).await?;
    ctx.social.respond(&requester.id, &user.id, response).await?;
    println!("@{}: {response}", requester.handle);
    Ok(())
}

/// Remove a friend
pub async fn remove(ctx: &AppContext, handle: &str) -> Result<()> {
    let user = current_user(ctx).await?;
    let friend = user_by_handle(ctx, handle).await?;
    if ctx.social.unfriend(&user.id, &friend.id).await? {
        println!("Removed @{}", friend.handle);
    } else {
        println!("@{} was not a friend", friend.handle);
    }
    Ok(())
}
