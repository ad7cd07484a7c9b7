// ABOUTME: Tests for decoding Gemini generateContent responses and image payloads
// ABOUTME: Every malformed reply must surface as the single user-facing analysis failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use calippo::constants::analysis::USER_FACING_FAILURE;
use calippo::errors::ErrorCode;
use calippo::llm::{parse_generate_content_response, parse_nutrition_text, ImagePayload};
use serde_json::json;

fn envelope(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "totalTokenCount": 321 }
    })
    .to_string()
}

const RECORD: &str = r#"{
    "foodName": "Grilled chicken salad",
    "calories": 420,
    "protein": 38.5,
    "carbs": 12,
    "fat": 22,
    "description": "Lean protein with greens.",
    "healthScore": 88
}"#;

fn assert_analysis_failure(body: &str) {
    let err = parse_generate_content_response(body).unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert_eq!(err.message, USER_FACING_FAILURE);
    assert!(err.details.is_some());
}

#[test]
fn test_parses_candidate_text() {
    let record = parse_generate_content_response(&envelope(RECORD)).unwrap();
    assert_eq!(record.food_name, "Grilled chicken salad");
    assert!((record.protein - 38.5).abs() < f64::EPSILON);
    assert!((record.health_score - 88.0).abs() < f64::EPSILON);
}

#[test]
fn test_joins_split_parts() {
    let (head, tail) = RECORD.split_at(40);
    let body = json!({
        "candidates": [{ "content": { "parts": [{ "text": head }, { "text": tail }] } }]
    })
    .to_string();
    let record = parse_generate_content_response(&body).unwrap();
    assert!((record.calories - 420.0).abs() < f64::EPSILON);
}

#[test]
fn test_missing_field_is_rejected() {
    let partial = r#"{"foodName":"Apple","calories":95,"protein":0.5,"carbs":25,"fat":0.3,"description":"Crunchy"}"#;
    assert!(parse_nutrition_text(partial).is_err());
    assert_analysis_failure(&envelope(partial));
}

#[test]
fn test_malformed_replies_are_rejected() {
    assert_analysis_failure("not json at all");
    assert_analysis_failure(r#"{"candidates": []}"#);
    assert_analysis_failure(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#);
    assert_analysis_failure(&envelope("   "));
    assert_analysis_failure(&envelope("Sorry, I cannot see any food."));
    assert_analysis_failure(
        r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#,
    );
}

#[test]
fn test_image_payload_parsing() {
    let raw = ImagePayload::parse("aGVsbG8=").unwrap();
    assert_eq!(raw.mime_type(), "image/jpeg");
    assert_eq!(raw.base64(), "aGVsbG8=");

    let url = ImagePayload::parse("data:image/jpeg;base64,aGVsbG8=").unwrap();
    assert_eq!(url.mime_type(), "image/jpeg");
    assert_eq!(url.data_url(), "data:image/jpeg;base64,aGVsbG8=");
    assert_eq!(url, raw);

    for bad in [
        "",
        "data:image/jpeg;base64,",
        "data:image/png;base64,aGVsbG8=",
        "data:image/webp;base64,aGVsbG8=",
        "data:text/plain;base64,aGVsbG8=",
        "data:image/png,aGVsbG8=",
        "***not base64***",
    ] {
        let err = ImagePayload::parse(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput, "{bad}");
    }
}
