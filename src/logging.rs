// ABOUTME: Logging configuration and structured domain events for the data layer
// ABOUTME: Configures tracing-subscriber output formats and records account, social, and scan events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup

use std::env;
use std::io;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::constants::service_names;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, production, testing)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for the developer CLI
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            service_name: service_names::CALIPPO.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::CALIPPO.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Build the filter, quieting HTTP client internals
    fn env_filter(&self) -> EnvFilter {
        let directive = env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone());
        EnvFilter::new(directive)
            .add_directive(
                "hyper=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "reqwest=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                format!("calippo={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events)
                        .json(),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "location": self.include_location,
                "spans": self.include_spans
            }
        });
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {}",
            summary
        );
    }
}

/// Structured domain events
pub struct AppLogger;

impl AppLogger {
    /// Log account lifecycle events (sign-up, sign-in, handle claim, deletion)
    pub fn log_account_event(user_id: &str, event: &str, success: bool, details: Option<&str>) {
        info!(
            user.id = %user_id,
            account.event = %event,
            account.success = %success,
            account.details = details.unwrap_or(""),
            "Account event"
        );
    }

    /// Log friend-graph mutations
    pub fn log_social_event(from_id: &str, to_id: &str, event: &str) {
        info!(
            social.from = %from_id,
            social.to = %to_id,
            social.event = %event,
            "Social event"
        );
    }

    /// Log a recorded scan
    pub fn log_scan_recorded(user_id: &str, food_name: &str, total_scans: u64, streak: u32) {
        info!(
            user.id = %user_id,
            scan.food = %food_name,
            scan.total = %total_scans,
            scan.streak = %streak,
            "Scan recorded"
        );
    }

    /// Log an evolution level-up
    pub fn log_level_up(user_id: &str, new_level: u32, creature: &str) {
        info!(
            user.id = %user_id,
            progression.level = %new_level,
            progression.creature = %creature,
            "Level up"
        );
    }

    /// Log an unlocked achievement
    pub fn log_achievement_unlocked(user_id: &str, badge: &str, xp: u64) {
        info!(
            user.id = %user_id,
            achievement.name = %badge,
            achievement.xp = %xp,
            "Achievement unlocked"
        );
    }

    /// Log a lost compare-and-swap race
    pub fn log_storage_conflict(key: &str, attempt: u32, max_attempts: u32) {
        if attempt < max_attempts {
            debug!(
                storage.key = %key,
                storage.attempt = %attempt,
                storage.max_attempts = %max_attempts,
                "Storage write conflict, retrying"
            );
        } else {
            warn!(
                storage.key = %key,
                storage.attempt = %attempt,
                storage.max_attempts = %max_attempts,
                "Storage write conflict, giving up"
            );
        }
    }
}
