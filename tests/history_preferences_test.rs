// ABOUTME: Integration tests for scan history and user preferences
// ABOUTME: Ordering, deletion, daily totals, comparisons, calorie goal, and theme
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use calippo::database::Theme;
use calippo::errors::ErrorCode;
use calippo::models::{ComparedMacro, UserId};
use calippo::storage::memory::MemoryStore;
use calippo::storage::{KeyValueStore, StorageKey};
use chrono::NaiveDate;
use common::{at, create_test_context, create_test_context_on, meal};

#[tokio::test]
async fn test_history_is_most_recent_first_and_per_user() {
    let ctx = create_test_context();
    let me = UserId::from("me");
    let other = UserId::from("other");

    ctx.history
        .append(&me, meal("Oats", 10.0), None, at(2025, 3, 1))
        .await
        .unwrap();
    let (latest, len) = ctx
        .history
        .append(&me, meal("Steak", 50.0), None, at(2025, 3, 2))
        .await
        .unwrap();
    assert_eq!(len, 2);

    let entries = ctx.history.list(&me).await.unwrap();
    assert_eq!(entries[0].id, latest.id);
    assert_eq!(entries[1].data.food_name, "Oats");
    assert!(ctx.history.list(&other).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_and_clear() {
    let ctx = create_test_context();
    let me = UserId::from("me");
    let (first, _) = ctx
        .history
        .append(&me, meal("Eggs", 18.0), None, at(2025, 3, 1))
        .await
        .unwrap();
    ctx.history
        .append(&me, meal("Rice", 4.0), None, at(2025, 3, 1))
        .await
        .unwrap();

    assert_eq!(ctx.history.delete(&me, &first.id).await.unwrap(), Some(1));
    assert_eq!(ctx.history.delete(&me, &first.id).await.unwrap(), None);
    assert!(ctx.history.get(&me, &first.id).await.unwrap().is_none());

    assert_eq!(ctx.history.clear(&me).await.unwrap(), 1);
    assert_eq!(ctx.history.len(&me).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_unknown_entry_writes_nothing() {
    let store = MemoryStore::new();
    let ctx = create_test_context_on(&store);
    let me = UserId::from("me");
    ctx.history
        .append(&me, meal("Eggs", 18.0), None, at(2025, 3, 1))
        .await
        .unwrap();
    let key = StorageKey::History(me.clone()).as_key();
    let before = store.get(&key).await.unwrap().unwrap().version;

    assert_eq!(ctx.history.delete(&me, "no-such-entry").await.unwrap(), None);
    assert_eq!(store.get(&key).await.unwrap().unwrap().version, before);

    // clearing an empty history never creates the key
    let other = UserId::from("other");
    assert_eq!(ctx.history.clear(&other).await.unwrap(), 0);
    assert!(store
        .get(&StorageKey::History(other).as_key())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_daily_totals_only_count_that_day() {
    let ctx = create_test_context();
    let me = UserId::from("me");
    ctx.history
        .append(&me, meal("Lunch", 30.0), None, at(2025, 3, 1))
        .await
        .unwrap();
    ctx.history
        .append(&me, meal("Dinner", 40.0), None, at(2025, 3, 1))
        .await
        .unwrap();
    ctx.history
        .append(&me, meal("Next day", 99.0), None, at(2025, 3, 2))
        .await
        .unwrap();

    let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let totals = ctx.history.daily_totals(&me, day).await.unwrap();
    assert_eq!(totals.entries, 2);
    assert!((totals.protein - 70.0).abs() < f64::EPSILON);
    assert!((totals.calories - 800.0).abs() < f64::EPSILON);
    assert!((totals.fats - 24.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_compare_keeps_selection_order() {
    let ctx = create_test_context();
    let me = UserId::from("me");
    let (a, _) = ctx
        .history
        .append(&me, meal("Tuna", 25.0), None, at(2025, 3, 1))
        .await
        .unwrap();
    let (b, _) = ctx
        .history
        .append(&me, meal("Tofu", 12.0), None, at(2025, 3, 1))
        .await
        .unwrap();

    let ids = vec![b.id.clone(), "missing".to_owned(), a.id.clone()];
    let comparison = ctx.history.compare(&me, &ids).await.unwrap();
    assert_eq!(comparison.rows.len(), 3);

    let protein = &comparison.rows[0];
    assert_eq!(protein.metric, ComparedMacro::Protein);
    assert_eq!(
        protein.values,
        vec![("Tofu".to_owned(), 12.0), ("Tuna".to_owned(), 25.0)]
    );
}

#[tokio::test]
async fn test_daily_goal_defaults_and_validates() {
    let ctx = create_test_context();
    assert_eq!(ctx.preferences.daily_goal().await.unwrap(), 2400);

    ctx.preferences.set_daily_goal(1800).await.unwrap();
    assert_eq!(ctx.preferences.daily_goal().await.unwrap(), 1800);

    let err = ctx.preferences.set_daily_goal(0).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(ctx.preferences.daily_goal().await.unwrap(), 1800);
}

#[tokio::test]
async fn test_theme_toggle() {
    let ctx = create_test_context();
    assert_eq!(ctx.preferences.theme().await.unwrap(), Theme::Light);
    assert_eq!(ctx.preferences.toggle_theme().await.unwrap(), Theme::Dark);
    assert_eq!(ctx.preferences.theme().await.unwrap(), Theme::Dark);

    ctx.preferences.set_theme(Theme::Light).await.unwrap();
    assert_eq!(ctx.preferences.toggle_theme().await.unwrap(), Theme::Dark);
    assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
}
