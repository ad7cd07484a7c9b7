// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory contexts, meal builders, and a scripted analyzer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `calippo`
//!
//! Every helper runs against the in-memory store so tests never touch the
//! filesystem or the network unless they opt in.

use std::collections::VecDeque;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use calippo::config::{AppConfig, StorageBackend};
use calippo::context::AppContext;
use calippo::errors::AppResult;
use calippo::llm::{FoodAnalyzer, ImagePayload};
use calippo::models::{NutritionRecord, User};
use calippo::storage::memory::MemoryStore;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration for the in-memory backend
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.storage.cas_max_retries = 64;
    config
}

/// Fresh context over a private in-memory store
pub fn create_test_context() -> AppContext {
    create_test_context_on(&MemoryStore::new())
}

/// Context over a shared in-memory store, like a second tab on one origin
pub fn create_test_context_on(store: &MemoryStore) -> AppContext {
    init_test_logging();
    AppContext::with_store(Arc::new(store.clone()), &test_config())
}

/// Sign up `email` and claim `handle`
pub async fn create_user(ctx: &AppContext, email: &str, handle: &str) -> User {
    let user = ctx.directory.create(email).await.unwrap();
    ctx.directory.claim_handle(&user.id, handle).await.unwrap()
}

/// Meal with the given protein and fixed other macros
pub fn meal(food: &str, protein: f64) -> NutritionRecord {
    NutritionRecord {
        food_name: food.to_owned(),
        calories: 400.0,
        protein,
        carbs: 30.0,
        fat: 12.0,
        description: "Solid fuel for training".to_owned(),
        health_score: 75.0,
    }
}

/// Noon UTC on the given day
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Analyzer returning pre-queued results in order
#[derive(Default)]
pub struct ScriptedAnalyzer {
    results: Mutex<VecDeque<AppResult<NutritionRecord>>>,
    seen: Mutex<Vec<ImagePayload>>,
}

impl ScriptedAnalyzer {
    pub fn new(results: Vec<AppResult<NutritionRecord>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub async fn calls(&self) -> usize {
        self.seen.lock().await.len()
    }
}

#[async_trait]
impl FoodAnalyzer for ScriptedAnalyzer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn analyze(&self, image: &ImagePayload) -> AppResult<NutritionRecord> {
        self.seen.lock().await.push(image.clone());
        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(meal("Fallback", 10.0)))
    }
}
