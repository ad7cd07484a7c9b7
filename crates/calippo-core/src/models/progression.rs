// ABOUTME: Per-user progression record: streak, freezes, XP, level, and lifetime macros
// ABOUTME: Also the streak display tiers and the policies that govern streaks and badges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::progression::{STARTING_FREEZE_TOKENS, STARTING_LEVEL};
use crate::errors::AppError;

/// Calendar status of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// At least one scan was recorded
    Streak,
    /// A freeze token covered the day
    Freeze,
    /// The streak broke on this day
    Broken,
}

/// Cumulative progression for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    /// Consecutive-day streak length
    pub streak: u32,
    /// Streak-protection credits
    pub freeze_count: u32,
    /// Time of the last recorded scan
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    /// Day status map for calendar rendering
    #[serde(default)]
    pub streak_history: BTreeMap<NaiveDate, DayStatus>,
    /// Names of achievements already celebrated
    #[serde(default)]
    pub celebrated_badge_names: BTreeSet<String>,
    /// Experience points
    pub xp: u64,
    /// Evolution level, starting at 1
    pub level: u32,
    /// Lifetime protein grams
    pub total_protein: f64,
    /// Lifetime carbohydrate grams
    pub total_carbs: f64,
    /// Lifetime fat grams
    pub total_fats: f64,
    /// Lifetime scan count
    pub total_scans: u64,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            streak: 0,
            freeze_count: STARTING_FREEZE_TOKENS,
            last_activity: None,
            streak_history: BTreeMap::new(),
            celebrated_badge_names: BTreeSet::new(),
            xp: 0,
            level: STARTING_LEVEL,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fats: 0.0,
            total_scans: 0,
        }
    }
}

impl ProgressionState {
    /// Day of the last recorded scan
    #[must_use]
    pub fn last_active_day(&self) -> Option<NaiveDate> {
        self.last_activity.map(|at| at.date_naive())
    }

    /// Status recorded for `day`, if any
    #[must_use]
    pub fn day_status(&self, day: NaiveDate) -> Option<DayStatus> {
        self.streak_history.get(&day).copied()
    }

    /// Display tier for the current streak
    #[must_use]
    pub const fn streak_tier(&self) -> StreakTier {
        StreakTier::for_days(self.streak)
    }
}

/// Display tier for a streak length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakTier {
    /// Under a week
    Rookie,
    /// A week or more
    Pro,
    /// 30 days or more
    Gold,
    /// 90 days or more
    Ultra,
    /// 180 days or more
    Diamond,
    /// A full year or more
    Mythic,
}

impl StreakTier {
    /// Tier for a streak length in days
    #[must_use]
    pub const fn for_days(days: u32) -> Self {
        match days {
            365.. => Self::Mythic,
            180.. => Self::Diamond,
            90.. => Self::Ultra,
            30.. => Self::Gold,
            7.. => Self::Pro,
            _ => Self::Rookie,
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Rookie => "Rookie",
            Self::Pro => "Pro",
            Self::Gold => "Gold",
            Self::Ultra => "Ultra",
            Self::Diamond => "Diamond",
            Self::Mythic => "Mythic",
        }
    }
}

/// How a scan moves the streak counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    /// Increment only on a new day that follows the last active day,
    /// spending freeze tokens to bridge gaps
    #[default]
    Consecutive,
    /// Increment on every scan regardless of dates
    Lenient,
}

impl Display for StreakPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Consecutive => write!(f, "consecutive"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for StreakPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consecutive" => Ok(Self::Consecutive),
            "lenient" => Ok(Self::Lenient),
            _ => Err(AppError::config(format!("Invalid streak policy: {s}"))),
        }
    }
}

/// How many newly crossed badges one evaluation celebrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementPolicy {
    /// Mark and credit every newly crossed badge
    #[default]
    AwardAll,
    /// Mark and credit only the lowest newly crossed badge
    OneAtATime,
}

impl Display for AchievementPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::AwardAll => write!(f, "award_all"),
            Self::OneAtATime => write!(f, "one_at_a_time"),
        }
    }
}

impl FromStr for AchievementPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "award_all" => Ok(Self::AwardAll),
            "one_at_a_time" => Ok(Self::OneAtATime),
            _ => Err(AppError::config(format!("Invalid achievement policy: {s}"))),
        }
    }
}
