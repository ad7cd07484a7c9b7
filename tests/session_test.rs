// ABOUTME: Integration tests for the current-user session
// ABOUTME: Sign-up, sign-in, sign-out, and reads that follow directory changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use calippo::errors::ErrorCode;
use calippo::storage::memory::MemoryStore;
use common::{create_test_context, create_test_context_on};

#[tokio::test]
async fn test_sign_up_establishes_session() {
    let ctx = create_test_context();
    assert!(ctx.session.current().await.unwrap().is_none());

    let user = ctx.session.sign_up("new@x.com").await.unwrap();
    assert_eq!(ctx.session.current_id().await.unwrap(), Some(user.id.clone()));
    assert!(ctx.session.needs_handle().await.unwrap());

    ctx.directory.claim_handle(&user.id, "newbie").await.unwrap();
    assert!(!ctx.session.needs_handle().await.unwrap());
}

#[tokio::test]
async fn test_sign_in_unknown_email() {
    let ctx = create_test_context();
    let err = ctx.session.sign_in("ghost@x.com").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UserNotFound);
    assert!(ctx.session.current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_out_and_back_in() {
    let ctx = create_test_context();
    let user = ctx.session.sign_up("back@x.com").await.unwrap();
    ctx.session.clear().await.unwrap();
    assert!(ctx.session.current().await.unwrap().is_none());
    let err = ctx.session.require_current().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UserNotFound);

    // signing out twice is harmless
    ctx.session.clear().await.unwrap();

    let again = ctx.session.sign_in(" back@x.com ").await.unwrap();
    assert_eq!(again.id, user.id);
}

#[tokio::test]
async fn test_session_reads_fresh_directory_state() {
    let store = MemoryStore::new();
    let tab_one = create_test_context_on(&store);
    let tab_two = create_test_context_on(&store);

    let me = tab_one.session.sign_up("me@x.com").await.unwrap();
    let friend = tab_two.directory.create("friend@x.com").await.unwrap();
    tab_two.social.request(&friend.id, &me.id).await.unwrap();

    // the session is only a pointer, so another tab's writes show up
    let current = tab_one.session.require_current().await.unwrap();
    assert_eq!(current.pending_requests, vec![friend.id.clone()]);

    tab_two.directory.delete(&me.id).await.unwrap();
    assert!(tab_one.session.current().await.unwrap().is_none());
}
