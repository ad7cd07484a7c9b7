// ABOUTME: Core types and constants for the Calippo meal-scanning data layer
// ABOUTME: Foundation crate with error handling, constants, and the pure data model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Calippo Core
//!
//! Foundation crate providing shared types and constants for the Calippo data
//! layer. Nothing here performs I/O, so the crate changes rarely and keeps
//! incremental builds of the workspace cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `ErrorCategory`
//! - **constants**: Storage keys, progression tuning and analysis defaults
//! - **models**: Users, nutrition records, progression state, evolution and badge tables

/// Unified error handling system with error codes and presentation categories
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;
