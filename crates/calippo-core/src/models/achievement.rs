// ABOUTME: Static badge table unlocked by cumulative scan count
// ABOUTME: Achievement entries with thresholds, XP rewards, and rarity tiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Rarity tier of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    /// Entry badges
    Bronze,
    /// Regular use
    Silver,
    /// Committed trackers
    Gold,
    /// Long-term trackers
    Platinum,
    /// Top of the table
    Diamond,
}

impl BadgeTier {
    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
        }
    }
}

/// A one-time reward unlocked at a scan-count threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    /// History length required
    pub threshold: usize,
    /// Unique badge name, also its identifier
    pub name: &'static str,
    /// Experience credited once on unlock
    pub xp: u64,
    /// Rarity tier
    pub tier: BadgeTier,
    /// Icon reference
    pub icon: &'static str,
}

impl Achievement {
    /// Human-readable requirement line
    #[must_use]
    pub fn requirement(&self) -> String {
        if self.threshold == 1 {
            "Scan your first meal".to_owned()
        } else {
            format!("Scan {} meals", self.threshold)
        }
    }
}

/// Badge table ordered by ascending threshold
pub const BADGES: &[Achievement] = &[
    Achievement { threshold: 1, name: "First Bite", xp: 50, tier: BadgeTier::Bronze, icon: "fa-utensils" },
    Achievement { threshold: 3, name: "Curious Eater", xp: 75, tier: BadgeTier::Bronze, icon: "fa-magnifying-glass" },
    Achievement { threshold: 5, name: "Snack Tracker", xp: 100, tier: BadgeTier::Bronze, icon: "fa-cookie-bite" },
    Achievement { threshold: 10, name: "Meal Mapper", xp: 150, tier: BadgeTier::Silver, icon: "fa-map" },
    Achievement { threshold: 25, name: "Macro Hunter", xp: 250, tier: BadgeTier::Silver, icon: "fa-crosshairs" },
    Achievement { threshold: 50, name: "Nutrition Ninja", xp: 400, tier: BadgeTier::Gold, icon: "fa-user-ninja" },
    Achievement { threshold: 100, name: "Century Feast", xp: 750, tier: BadgeTier::Gold, icon: "fa-trophy" },
    Achievement { threshold: 250, name: "Fuel Master", xp: 1500, tier: BadgeTier::Platinum, icon: "fa-bolt" },
    Achievement { threshold: 500, name: "Iron Stomach", xp: 3000, tier: BadgeTier::Diamond, icon: "fa-shield" },
    Achievement { threshold: 1000, name: "Calippo Immortal", xp: 6000, tier: BadgeTier::Diamond, icon: "fa-crown" },
];

/// Look up a badge by name
#[must_use]
pub fn badge_by_name(name: &str) -> Option<&'static Achievement> {
    BADGES.iter().find(|badge| badge.name == name)
}
