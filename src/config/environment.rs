// ABOUTME: Environment configuration for the local data layer and the analysis collaborator
// ABOUTME: Parses CALIPPO_* variables into typed storage, progression, and Gemini settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{analysis, concurrency, service_names};
use crate::errors::{AppError, AppResult};
use crate::models::{AchievementPolicy, StreakPolicy};

/// Environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(&self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Key-value backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    Memory,
    /// JSON document in the data directory
    #[default]
    File,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            _ => Err(AppError::config(format!("Invalid storage backend: {s}"))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use
    pub backend: StorageBackend,
    /// Directory for the file backend
    pub data_dir: PathBuf,
    /// Compare-and-swap attempts per update before giving up
    pub cas_max_retries: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            cas_max_retries: concurrency::DEFAULT_CAS_MAX_RETRIES,
        }
    }
}

/// Progression rules
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// How scans move the streak
    pub streak_policy: StreakPolicy,
    /// How many newly crossed badges one evaluation awards
    pub achievement_policy: AchievementPolicy,
}

/// Gemini vision analysis settings
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; analysis is unavailable without it
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: analysis::DEFAULT_MODEL.to_owned(),
            base_url: analysis::DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(analysis::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Storage backend settings
    pub storage: StorageConfig,
    /// Streak and badge rules
    pub progression: ProgressionConfig,
    /// Analysis collaborator settings
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable cannot be parsed or the
    /// resulting configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let storage = StorageConfig {
            backend: env_parse("CALIPPO_STORAGE_BACKEND")?.unwrap_or_default(),
            data_dir: env::var("CALIPPO_DATA_DIR")
                .map_or_else(|_| default_data_dir(), PathBuf::from),
            cas_max_retries: env_parse("CALIPPO_CAS_MAX_RETRIES")?
                .unwrap_or(concurrency::DEFAULT_CAS_MAX_RETRIES),
        };

        let progression = ProgressionConfig {
            streak_policy: env_parse("CALIPPO_STREAK_POLICY")?.unwrap_or_default(),
            achievement_policy: env_parse("CALIPPO_ACHIEVEMENT_POLICY")?.unwrap_or_default(),
        };

        let gemini = GeminiConfig {
            api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("CALIPPO_GEMINI_MODEL")
                .unwrap_or_else(|_| analysis::DEFAULT_MODEL.to_owned()),
            base_url: env::var("CALIPPO_GEMINI_BASE_URL")
                .unwrap_or_else(|_| analysis::DEFAULT_BASE_URL.to_owned()),
            timeout: Duration::from_secs(
                env_parse("CALIPPO_ANALYSIS_TIMEOUT_SECS")?
                    .unwrap_or(analysis::DEFAULT_TIMEOUT_SECS),
            ),
        };

        let config = Self {
            environment: Environment::from_str_or_default(
                &env::var("ENVIRONMENT").unwrap_or_default(),
            ),
            storage,
            progression,
            gemini,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a zero retry limit, a zero timeout, or an
    /// empty model name
    pub fn validate(&self) -> AppResult<()> {
        if self.storage.cas_max_retries == 0 {
            return Err(AppError::config(
                "CALIPPO_CAS_MAX_RETRIES must be at least 1",
            ));
        }
        if self.gemini.timeout.is_zero() {
            return Err(AppError::config(
                "CALIPPO_ANALYSIS_TIMEOUT_SECS must be greater than 0",
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(AppError::config("CALIPPO_GEMINI_MODEL must not be empty"));
        }
        if self.gemini.api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; meal analysis is unavailable");
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} configuration:\n\
             - Environment: {}\n\
             - Storage: {} ({})\n\
             - CAS retries: {}\n\
             - Streak policy: {}\n\
             - Achievement policy: {}\n\
             - Gemini model: {}\n\
             - Analysis: {}",
            service_names::CALIPPO,
            self.environment,
            self.storage.backend,
            self.storage.data_dir.display(),
            self.storage.cas_max_retries,
            self.progression.streak_policy,
            self.progression.achievement_policy,
            self.gemini.model,
            if self.gemini.api_key.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

/// Platform data directory for the file backend
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(service_names::CALIPPO)
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        _ => Ok(None),
    }
}
