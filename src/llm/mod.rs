// ABOUTME: Vision analysis abstraction turning a meal photo into a nutrition record
// ABOUTME: FoodAnalyzer trait, image payload handling, and the shared failure mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Meal analysis
//!
//! The only operation in the data flow that suspends on the network. Every
//! failure, whatever its cause, surfaces as one `ExternalServiceError` with
//! a fixed user-facing message; the cause is kept in the error details for
//! logs. No partial result is ever returned.
//!
//! ```rust,no_run
//! use calippo::llm::{FoodAnalyzer, ImagePayload};
//! use calippo::errors::AppError;
//!
//! async fn example(analyzer: &dyn FoodAnalyzer, jpeg: &[u8]) -> Result<(), AppError> {
//!     let record = analyzer.analyze(&ImagePayload::from_bytes(jpeg)).await?;
//!     println!("{}: {} kcal", record.food_name, record.calories);
//!     Ok(())
//! }
//! ```

mod gemini;

pub use gemini::{parse_generate_content_response, parse_nutrition_text, GeminiVisionAnalyzer};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;

use crate::constants::analysis::{IMAGE_MIME_TYPE, USER_FACING_FAILURE};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::NutritionRecord;

/// A captured JPEG image ready to send for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    base64: String,
    mime_type: &'static str,
}

impl ImagePayload {
    /// Wrap raw JPEG bytes
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
            mime_type: IMAGE_MIME_TYPE,
        }
    }

    /// Accept either a `data:image/jpeg;base64,` URL or bare base64 JPEG text
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the payload is empty, the data URL is
    /// malformed or not JPEG, or the base64 does not decode
    pub fn parse(data: &str) -> AppResult<Self> {
        let data = data.trim();
        let encoded = match data.strip_prefix("data:") {
            Some(rest) => {
                let (header, encoded) = rest
                    .split_once(',')
                    .ok_or_else(|| AppError::invalid_input("Image data URL has no payload"))?;
                header
                    .strip_suffix(";base64")
                    .filter(|mime| mime.eq_ignore_ascii_case(IMAGE_MIME_TYPE))
                    .ok_or_else(|| {
                        AppError::invalid_input(format!(
                            "Image data URL must be base64-encoded {IMAGE_MIME_TYPE}"
                        ))
                    })?;
                encoded
            }
            None => data,
        };
        if encoded.is_empty() {
            return Err(AppError::invalid_input("Image payload is empty"));
        }
        STANDARD
            .decode(encoded)
            .map_err(|e| AppError::invalid_input(format!("Image payload is not valid base64: {e}")))?;
        Ok(Self {
            base64: encoded.to_owned(),
            mime_type: IMAGE_MIME_TYPE,
        })
    }

    /// Base64 image data
    #[must_use]
    pub fn base64(&self) -> &str {
        &self.base64
    }

    /// Image mime type
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Data URL stored as the history entry's image reference
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Error returned for every failed analysis
pub fn analysis_failed(cause: impl Into<String>) -> AppError {
    let cause = cause.into();
    AppError::new(ErrorCode::ExternalServiceError, USER_FACING_FAILURE)
        .with_details(json!({ "cause": cause }))
}

/// Meal image analyzer
#[async_trait]
pub trait FoodAnalyzer: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Estimate the nutrition of the meal in `image`
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` for any transport, status, or
    /// response-shape failure
    async fn analyze(&self, image: &ImagePayload) -> AppResult<NutritionRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_prefix_is_stripped() {
        let payload = ImagePayload::parse("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.base64(), "aGVsbG8=");
        assert_eq!(payload.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_bare_base64_defaults_to_jpeg() {
        let payload = ImagePayload::parse("aGVsbG8=").unwrap();
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(payload.data_url(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_bytes_are_encoded() {
        assert_eq!(ImagePayload::from_bytes(b"hello").base64(), "aGVsbG8=");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(ImagePayload::parse("").is_err());
        assert!(ImagePayload::parse("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(ImagePayload::parse("data:image/jpeg;base64").is_err());
        assert!(ImagePayload::parse("data:image/png;base64,aGVsbG8=").is_err());
        assert!(ImagePayload::parse("not base64!").is_err());
    }

    #[test]
    fn test_failure_uses_fixed_message() {
        let error = analysis_failed("timeout");
        assert_eq!(error.code, ErrorCode::ExternalServiceError);
        assert_eq!(error.message, USER_FACING_FAILURE);
        assert_eq!(error.details.unwrap()["cause"], "timeout");
    }
}
