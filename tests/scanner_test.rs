// ABOUTME: Integration tests for the scan coordinator
// ABOUTME: Single in-flight capture, stale result discarding, and failure states
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use calippo::constants::analysis::USER_FACING_FAILURE;
use calippo::errors::ErrorCode;
use calippo::llm::{analysis_failed, ImagePayload};
use calippo::models::UserId;
use calippo::scanner::{ScanResolution, ScanStatus};
use common::{at, create_test_context, meal, ScriptedAnalyzer};

fn photo() -> ImagePayload {
    ImagePayload::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
}

#[tokio::test]
async fn test_successful_scan_records_history() {
    let analyzer = ScriptedAnalyzer::new(vec![Ok(meal("Burrito bowl", 42.0))]);
    let ctx = create_test_context().with_analyzer(analyzer.clone());
    let me = UserId::from("me");

    let resolution = ctx.scanner.scan(&me, photo(), at(2025, 5, 1)).await.unwrap();
    let outcome = match resolution {
        ScanResolution::Completed(outcome) => outcome,
        other => panic!("expected a completed scan, got {other:?}"),
    };
    assert_eq!(outcome.entry.data.food_name, "Burrito bowl");
    assert_eq!(outcome.level_up, Some(2));
    assert_eq!(analyzer.calls().await, 1);

    let history = ctx.history.list(&me).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].image.as_deref(), Some(photo().data_url().as_str()));
    assert!(matches!(ctx.scanner.status().await, ScanStatus::Result(_)));

    ctx.scanner.reset().await;
    assert!(matches!(ctx.scanner.status().await, ScanStatus::Idle));
}

#[tokio::test]
async fn test_second_capture_is_rejected_while_scanning() {
    let ctx = create_test_context();
    let _ticket = ctx.scanner.begin(photo()).await.unwrap();
    assert!(ctx.scanner.status().await.is_scanning());

    let err = ctx.scanner.begin(photo()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ScanInProgress);
}

#[tokio::test]
async fn test_abandoned_scan_is_discarded() {
    let ctx = create_test_context();
    let me = UserId::from("me");

    let ticket = ctx.scanner.begin(photo()).await.unwrap();
    ctx.scanner.abandon().await;
    assert!(matches!(ctx.scanner.status().await, ScanStatus::Idle));

    let resolution = ctx
        .scanner
        .complete(ticket, &me, Ok(meal("Late pizza", 20.0)), at(2025, 5, 1))
        .await;
    assert!(matches!(resolution, ScanResolution::Discarded));
    assert!(ctx.history.list(&me).await.unwrap().is_empty());
    assert_eq!(ctx.ledger.state(&me).await.unwrap().total_scans, 0);

    // a stale ticket does not block the next capture
    let fresh = ctx.scanner.begin(photo()).await.unwrap();
    let resolution = ctx
        .scanner
        .complete(fresh, &me, Ok(meal("Fresh pizza", 20.0)), at(2025, 5, 1))
        .await;
    assert!(matches!(resolution, ScanResolution::Completed(_)));
}

#[tokio::test]
async fn test_failed_analysis_shows_error_and_writes_nothing() {
    let analyzer = ScriptedAnalyzer::new(vec![Err(analysis_failed("timeout"))]);
    let ctx = create_test_context().with_analyzer(analyzer);
    let me = UserId::from("me");

    let resolution = ctx.scanner.scan(&me, photo(), at(2025, 5, 1)).await.unwrap();
    let err = match resolution {
        ScanResolution::Failed(err) => err,
        other => panic!("expected a failure, got {other:?}"),
    };
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert_eq!(err.message, USER_FACING_FAILURE);

    match ctx.scanner.status().await {
        ScanStatus::Error(message) => assert_eq!(message, USER_FACING_FAILURE),
        other => panic!("expected error status, got {other:?}"),
    }
    assert!(ctx.history.list(&me).await.unwrap().is_empty());

    ctx.scanner.reset().await;
    assert!(ctx.scanner.begin(photo()).await.is_ok());
}

#[tokio::test]
async fn test_scan_without_analyzer_fails() {
    let ctx = create_test_context();
    let me = UserId::from("me");
    let resolution = ctx.scanner.scan(&me, photo(), at(2025, 5, 1)).await.unwrap();
    let err = match resolution {
        ScanResolution::Failed(err) => err,
        other => panic!("expected a failure, got {other:?}"),
    };
    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
}
