// ABOUTME: Typed persistence over the key-value store
// ABOUTME: Document repository plus the directory, friend graph, history, and preferences built on it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Local data layer
//!
//! Each component owns one or more whole JSON values in the store and
//! mutates them through [`DocumentRepository::update`], which retries on
//! compare-and-swap conflicts. The account directory and the friend graph
//! share a single value so that both endpoints of a relationship change in
//! one write.

/// Account directory
pub mod directory;
/// Per-user scan history
pub mod history;
/// Daily goal and theme
pub mod preferences;
/// Versioned repository over one key
pub mod repository;
/// Friend-relationship graph
pub mod social;

pub use directory::{AccountDirectory, UserTable};
pub use history::{HistoryLog, HistoryStore};
pub use preferences::{Preferences, Theme};
pub use repository::{DocumentRepository, Snapshot};
pub use social::FriendGraph;
