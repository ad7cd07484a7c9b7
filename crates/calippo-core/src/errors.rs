// ABOUTME: Unified error handling with error codes, user-facing categories, and storage errors
// ABOUTME: AppError is the single error type surfaced by every Calippo operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the data layer returns [`AppResult`]. An
//! [`AppError`] carries a stable [`ErrorCode`], a message, optional JSON
//! details and an optional source error. Each code belongs to one
//! [`ErrorCategory`], which tells the interface how to surface it:
//! validation problems inline, lookup misses as a generic message, and
//! analysis failures as a full-screen "try again" state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Generic invalid input
    InvalidInput = 3000,
    /// A required field is absent
    MissingRequiredField = 3001,
    /// Data is not in the expected format
    InvalidFormat = 3002,
    /// Handle does not satisfy the handle rules
    InvalidHandle = 3003,

    // Resource Management (4000-4999)
    /// Generic lookup miss
    ResourceNotFound = 4000,
    /// An account with the same email already exists
    DuplicateEmail = 4001,
    /// The handle is already claimed by another account
    HandleTaken = 4002,
    /// No account matches the identifier or email
    UserNotFound = 4004,
    /// A scan is already running; concurrent captures are rejected
    ScanInProgress = 4009,
    /// Optimistic write kept losing against concurrent writers
    ConcurrentModification = 4010,

    // External Services (5000-5999)
    /// The analysis service failed or returned an unusable response
    ExternalServiceError = 5000,
    /// No analysis service is configured or reachable
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration is missing
    ConfigMissing = 6001,
    /// Configuration is invalid
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// Storage backend failure
    StorageError = 9002,
    /// JSON encode/decode failure
    SerializationError = 9003,
}

/// How an error is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Shown inline next to the offending input, recoverable without restart
    Validation,
    /// Shown as a generic message
    NotFound,
    /// Shown as a full-screen error with a single "try again" action
    ExternalService,
    /// Transient contention, safe to retry the whole operation
    Conflict,
    /// Anything else; the interface returns to a stable state
    Internal,
}

impl ErrorCode {
    /// Category used to decide how the error is presented
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::InvalidHandle
            | Self::DuplicateEmail
            | Self::HandleTaken => ErrorCategory::Validation,
            Self::ResourceNotFound | Self::UserNotFound => ErrorCategory::NotFound,
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => {
                ErrorCategory::ExternalService
            }
            Self::ScanInProgress | Self::ConcurrentModification => ErrorCategory::Conflict,
            Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError
            | Self::StorageError
            | Self::SerializationError => ErrorCategory::Internal,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "The data format is invalid",
            Self::InvalidHandle => {
                "Handles are 3-20 characters of lowercase letters, digits or underscores"
            }
            Self::ResourceNotFound => "The requested resource was not found",
            Self::DuplicateEmail => "Email already exists",
            Self::HandleTaken => "Username is taken",
            Self::UserNotFound => "User not found",
            Self::ScanInProgress => "A scan is already in progress",
            Self::ConcurrentModification => "The data was changed elsewhere, please retry",
            Self::ExternalServiceError => "The analysis service encountered an error",
            Self::ExternalServiceUnavailable => "The analysis service is unavailable",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured context
    pub details: Option<serde_json::Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Presentation category of this error
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Whether retrying the same operation may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.code.category(),
            ErrorCategory::ExternalService | ErrorCategory::Conflict
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// No account with this identifier or email
    pub fn user_not_found(who: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, format!("User {} not found", who.into()))
    }

    /// Email already registered
    pub fn duplicate_email(email: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateEmail,
            format!("An account for {email} already exists"),
        )
    }

    /// Handle failed validation
    pub fn invalid_handle(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidHandle, message)
    }

    /// Handle already claimed
    pub fn handle_taken(handle: &str) -> Self {
        Self::new(
            ErrorCode::HandleTaken,
            format!("Handle '{handle}' is already taken"),
        )
    }

    /// A scan is already running
    pub fn scan_in_progress() -> Self {
        Self::new(ErrorCode::ScanInProgress, "Wait for the current scan to finish")
    }

    /// CAS retries exhausted on a key
    pub fn concurrent_modification(key: &str, attempts: u32) -> Self {
        Self::new(
            ErrorCode::ConcurrentModification,
            format!("Gave up writing '{key}' after {attempts} conflicting attempts"),
        )
        .with_details(serde_json::json!({ "key": key, "attempts": attempts }))
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

/// Errors raised by key-value storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        /// File the backend was touching
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Stored value could not be encoded or decoded
    #[error("value under '{key}' could not be (de)serialized: {source}")]
    Serialization {
        /// Logical key of the value
        key: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
    /// Backing document is unreadable as a whole
    #[error("storage document is corrupt: {0}")]
    Corrupt(String),
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        let code = match &error {
            StorageError::Serialization { .. } => ErrorCode::SerializationError,
            StorageError::Io { .. } | StorageError::Corrupt(_) => ErrorCode::StorageError,
        };
        let message = error.to_string();
        Self::new(code, message).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
