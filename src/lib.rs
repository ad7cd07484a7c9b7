// ABOUTME: Main library entry point for the Calippo meal-scanning data layer
// ABOUTME: Accounts, friends, scan history, progression, badges, and vision analysis over a key-value store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Calippo
//!
//! Local data layer for a meal-scanning app: a photographed meal is analysed
//! into a nutrition record, stored in the user's history, and folded into a
//! gamified progression record (streaks, XP, a 200-step evolution table and
//! scan-count badges). Accounts and a friend graph live in the same
//! key-value store.
//!
//! ## Architecture
//!
//! - **storage**: key-value adapter with versioned compare-and-swap
//! - **database**: typed repositories, account directory, friend graph, history, preferences
//! - **session**: current-user pointer
//! - **progression**: ledger, streak engine, achievement evaluator
//! - **llm**: vision analysis collaborator
//! - **scanner**: capture-to-result state machine
//! - **context**: wiring from configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use calippo::config::AppConfig;
//! use calippo::context::AppContext;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), calippo::errors::AppError> {
//!     let config = AppConfig::from_env()?;
//!     let ctx = AppContext::from_config(&config).await?;
//!     let user = ctx.session.sign_up("a@x.com").await?;
//!     ctx.directory.claim_handle(&user.id, "ninja1").await?;
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Application constants (re-exported from `calippo-core`)
pub mod constants {
    pub use calippo_core::constants::*;
}

/// Application context wiring
pub mod context;

/// Typed persistence: directory, friends, history, preferences
pub mod database;

/// Unified error handling (re-exported from `calippo-core`)
pub mod errors {
    pub use calippo_core::errors::*;
}

/// Vision analysis collaborator
pub mod llm;

/// Logging configuration and domain events
pub mod logging;

/// Data models (re-exported from `calippo-core`)
pub mod models {
    pub use calippo_core::models::*;
}

/// Progression ledger, streaks, and achievements
pub mod progression;

/// Scan flow state machine
pub mod scanner;

/// Current-user session
pub mod session;

/// Key-value storage adapter
pub mod storage;
