// ABOUTME: Google Gemini vision analyzer for meal photos
// ABOUTME: Sends the image with a fixed instruction and parses the schema-constrained JSON reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use super::{analysis_failed, FoodAnalyzer, ImagePayload};
use crate::config::GeminiConfig;
use crate::constants::analysis::INSTRUCTION;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::NutritionRecord;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Schema the model must answer with
fn nutrition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "foodName": { "type": "STRING" },
            "calories": { "type": "NUMBER" },
            "protein": { "type": "NUMBER" },
            "carbs": { "type": "NUMBER" },
            "fat": { "type": "NUMBER" },
            "description": { "type": "STRING" },
            "healthScore": {
                "type": "NUMBER",
                "description": "Health score from 1-100 based on nutrition"
            }
        },
        "required": [
            "foodName", "calories", "protein", "carbs", "fat", "description", "healthScore"
        ]
    })
}

/// Decode the model's JSON text into a record; every field is required
///
/// # Errors
///
/// Returns `ExternalServiceError` if the text is not a complete record
pub fn parse_nutrition_text(text: &str) -> AppResult<NutritionRecord> {
    serde_json::from_str(text.trim())
        .map_err(|e| analysis_failed(format!("malformed nutrition JSON: {e}")))
}

/// Extract and decode the record from a `generateContent` response body
///
/// # Errors
///
/// Returns `ExternalServiceError` for an API error payload, a response
/// without candidate text, or malformed record JSON
pub fn parse_generate_content_response(body: &str) -> AppResult<NutritionRecord> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| analysis_failed(format!("unreadable response envelope: {e}")))?;
    if let Some(api_error) = response.error {
        return Err(analysis_failed(format!("Gemini API error: {}", api_error.message)));
    }
    let text = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| analysis_failed("response has no candidate text"))?;
    parse_nutrition_text(&text)
}

// ============================================================================
// Analyzer Implementation
// ============================================================================

/// Gemini-backed meal analyzer
pub struct GeminiVisionAnalyzer {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl Debug for GeminiVisionAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiVisionAnalyzer")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiVisionAnalyzer {
    /// Create an analyzer from configuration
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` when no API key is configured and
    /// an internal error if the HTTP client cannot be built
    pub fn from_config(config: &GeminiConfig) -> AppResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                "GEMINI_API_KEY is not configured",
            )
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(image: &ImagePayload) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_owned(),
                            data: image.base64().to_owned(),
                        },
                    },
                    RequestPart::Text {
                        text: INSTRUCTION.to_owned(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: nutrition_schema(),
            },
        }
    }
}

#[async_trait]
impl FoodAnalyzer for GeminiVisionAnalyzer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, image), fields(model = %self.model))]
    async fn analyze(&self, image: &ImagePayload) -> AppResult<NutritionRecord> {
        debug!("Sending meal image to Gemini");
        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(image))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini request failed");
                analysis_failed(format!("HTTP request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| analysis_failed(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(analysis_failed(format!("Gemini API status {status}: {body}")));
        }

        let record = parse_generate_content_response(&body).inspect_err(|e| {
            error!(details = ?e.details, "Gemini response rejected");
        })?;
        debug!(food = %record.food_name, "Gemini analysis complete");
        Ok(record)
    }
}
