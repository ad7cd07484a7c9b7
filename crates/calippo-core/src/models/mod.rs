// ABOUTME: Core data models shared by every Calippo component
// ABOUTME: Users, nutrition records, progression state, evolution tiers, and badges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Static badge table
pub mod achievement;
/// Static 200-step evolution table
pub mod evolution;
/// Meal analysis results and history entries
pub mod nutrition;
/// Per-user progression record and policies
pub mod progression;
/// Friend-graph value types
pub mod social;
/// Account records
pub mod user;

pub use achievement::{badge_by_name, Achievement, BadgeTier, BADGES};
pub use evolution::{evolution_table, required_protein, required_scans, tier, EvolutionTier, Rarity};
pub use nutrition::{
    non_negative, ComparedMacro, ComparisonRow, DailyProgress, HistoryEntry, MacroComparison,
    MacroTotals, NutritionRecord,
};
pub use progression::{AchievementPolicy, DayStatus, ProgressionState, StreakPolicy, StreakTier};
pub use social::{FriendResponse, Relationship, RequestOutcome};
pub use user::{Handle, User, UserId};
