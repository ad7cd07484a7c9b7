// ABOUTME: Integration tests for the account directory
// ABOUTME: Validates email uniqueness, handle claims, search, and account deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use calippo::errors::ErrorCode;
use calippo::models::UserId;
use calippo::storage::memory::MemoryStore;
use calippo::storage::{KeyValueStore, StorageKey};
use common::{create_test_context, create_test_context_on, create_user};

#[tokio::test]
async fn test_create_rejects_duplicate_email() {
    let ctx = create_test_context();
    let first = ctx.directory.create("a@x.com").await.unwrap();
    assert!(first.handle.is_empty());
    assert!(first.needs_handle());

    let err = ctx.directory.create("a@x.com").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateEmail);

    // surrounding whitespace does not make a new address
    let err = ctx.directory.create("  a@x.com ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateEmail);

    assert_eq!(ctx.directory.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_blank_email() {
    let ctx = create_test_context();
    let err = ctx.directory.create("   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_find_by_email_and_id() {
    let ctx = create_test_context();
    let user = ctx.directory.create("b@x.com").await.unwrap();

    let by_email = ctx.directory.find_by_email("b@x.com").await.unwrap();
    assert_eq!(by_email.as_ref().map(|u| &u.id), Some(&user.id));
    assert!(ctx.directory.find_by_email("nobody@x.com").await.unwrap().is_none());

    let by_id = ctx.directory.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "b@x.com");
    assert!(ctx
        .directory
        .find_by_id(&UserId::from("missing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_handle_collision_is_case_insensitive() {
    let ctx = create_test_context();
    let a = create_user(&ctx, "a@x.com", "ninja1").await;
    assert_eq!(a.handle, "ninja1");

    let b = ctx.directory.create("b@x.com").await.unwrap();
    assert!(!ctx.directory.is_handle_available("Ninja1").await.unwrap());

    let err = ctx.directory.claim_handle(&b.id, "Ninja1").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::HandleTaken);

    let b = ctx.directory.find_by_id(&b.id).await.unwrap().unwrap();
    assert!(b.handle.is_empty());
}

#[tokio::test]
async fn test_claim_handle_normalizes_and_validates() {
    let ctx = create_test_context();
    let user = ctx.directory.create("c@x.com").await.unwrap();

    let claimed = ctx.directory.claim_handle(&user.id, "Snack_King").await.unwrap();
    assert_eq!(claimed.handle, "snack_king");

    // re-claiming your own handle is fine
    ctx.directory.claim_handle(&user.id, "snack_king").await.unwrap();

    for bad in ["ab", "way_too_long_handle_here", "no spaces", "dash-es"] {
        let err = ctx.directory.claim_handle(&user.id, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidHandle, "{bad}");
    }

    let err = ctx
        .directory
        .claim_handle(&UserId::from("ghost"), "ghosty")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UserNotFound);
}

#[tokio::test]
async fn test_handle_availability() {
    let ctx = create_test_context();
    assert!(ctx.directory.is_handle_available("free_name").await.unwrap());
    assert!(!ctx.directory.is_handle_available("").await.unwrap());

    create_user(&ctx, "d@x.com", "free_name").await;
    assert!(!ctx.directory.is_handle_available("FREE_NAME").await.unwrap());

    let found = ctx.directory.find_by_handle("Free_Name").await.unwrap();
    assert_eq!(found.map(|u| u.email), Some("d@x.com".to_owned()));
}

#[tokio::test]
async fn test_search_limits_results_and_excludes_requester() {
    let ctx = create_test_context();
    let me = create_user(&ctx, "me@x.com", "lifter_me").await;
    for i in 0..7 {
        create_user(&ctx, &format!("l{i}@x.com"), &format!("lifter_{i}")).await;
    }

    let results = ctx.directory.search("LIFTER", &me.id).await.unwrap();
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|u| u.id != me.id));

    assert!(ctx.directory.search("   ", &me.id).await.unwrap().is_empty());
    assert!(ctx.directory.search("zzz", &me.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_matches_display_name() {
    let ctx = create_test_context();
    let me = create_user(&ctx, "me@x.com", "viewer").await;
    let other = create_user(&ctx, "o@x.com", "xyz_123").await;
    ctx.directory
        .set_display_name(&other.id, Some("Protein Pam"))
        .await
        .unwrap();

    let results = ctx.directory.search("pam", &me.id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, other.id);

    let cleared = ctx.directory.set_display_name(&other.id, Some("  ")).await.unwrap();
    assert!(cleared.display_name.is_none());
}

#[tokio::test]
async fn test_delete_scrubs_relationships() {
    let ctx = create_test_context();
    let a = create_user(&ctx, "a@x.com", "alpha").await;
    let b = create_user(&ctx, "b@x.com", "bravo").await;
    let c = create_user(&ctx, "c@x.com", "charlie").await;

    ctx.social.request(&a.id, &b.id).await.unwrap();
    ctx.social.request(&b.id, &a.id).await.unwrap();
    ctx.social.request(&b.id, &c.id).await.unwrap();

    assert!(ctx.directory.delete(&b.id).await.unwrap());
    assert!(!ctx.directory.delete(&b.id).await.unwrap());

    let a = ctx.directory.find_by_id(&a.id).await.unwrap().unwrap();
    let c = ctx.directory.find_by_id(&c.id).await.unwrap().unwrap();
    assert!(a.friends.is_empty());
    assert!(c.pending_requests.is_empty());
    assert!(ctx.directory.is_handle_available("bravo").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_claims_of_one_handle_admit_a_single_holder() {
    let store = MemoryStore::new();
    let tab_a = create_test_context_on(&store);
    let tab_b = create_test_context_on(&store);
    let a = tab_a.directory.create("a@x.com").await.unwrap();
    let b = tab_b.directory.create("b@x.com").await.unwrap();

    let (claim_a, claim_b) = tokio::join!(
        tab_a.directory.claim_handle(&a.id, "ninja1"),
        tab_b.directory.claim_handle(&b.id, "Ninja1"),
    );

    assert_eq!(
        usize::from(claim_a.is_ok()) + usize::from(claim_b.is_ok()),
        1,
        "exactly one claim must win"
    );
    let loser = claim_a.err().or(claim_b.err()).unwrap();
    assert_eq!(loser.code, ErrorCode::HandleTaken);

    let holders = tab_a
        .directory
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|user| user.handle == "ninja1")
        .count();
    assert_eq!(holders, 1);
}

#[tokio::test]
async fn test_noop_delete_leaves_directory_version_untouched() {
    let store = MemoryStore::new();
    let ctx = create_test_context_on(&store);
    create_user(&ctx, "a@x.com", "ninja1").await;
    let key = StorageKey::Users.as_key();
    let before = store.get(&key).await.unwrap().unwrap().version;

    assert!(!ctx.directory.delete(&UserId::from("missing")).await.unwrap());
    let err = ctx
        .directory
        .claim_handle(&UserId::from("missing"), "ghost")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UserNotFound);

    assert_eq!(store.get(&key).await.unwrap().unwrap().version, before);
}
