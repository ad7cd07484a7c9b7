// ABOUTME: Configuration management module for the Calippo data layer
// ABOUTME: Re-exports the environment-driven application configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment and storage configuration
pub mod environment;

pub use environment::{
    AppConfig, Environment, GeminiConfig, ProgressionConfig, StorageBackend, StorageConfig,
};
