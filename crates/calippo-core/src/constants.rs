// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Storage keys, progression tuning, handle rules, and analysis defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Logical storage key names
pub mod storage_keys {
    /// Account directory blob
    pub const USERS: &str = "calippo_db_users";
    /// Current session pointer
    pub const CURRENT_USER: &str = "calippo_current_user";
    /// Prefix for a user's scan history
    pub const HISTORY_PREFIX: &str = "calippo_history";
    /// Prefix for a user's progression record
    pub const STATS_PREFIX: &str = "calippo_stats";
    /// Daily calorie goal scalar
    pub const DAILY_GOAL: &str = "calippo_daily_goal";
    /// Theme preference flag
    pub const THEME: &str = "theme";
    /// File name of the on-disk store document
    pub const STORE_FILE_NAME: &str = "calippo_store.json";
    /// Sidecar file holding the cross-process write lock
    pub const STORE_LOCK_FILE_NAME: &str = "calippo_store.lock";
}

/// Handle (username) rules
pub mod handles {
    /// Minimum handle length
    pub const MIN_LENGTH: usize = 3;
    /// Maximum handle length
    pub const MAX_LENGTH: usize = 20;
}

/// Directory search
pub mod search {
    /// Maximum number of users a search returns
    pub const MAX_RESULTS: usize = 5;
}

/// Progression tuning
pub mod progression {
    /// Experience awarded for every recorded scan
    pub const XP_PER_SCAN: u64 = 25;
    /// Number of evolution tiers; also the level cap
    pub const MAX_LEVEL: u32 = 200;
    /// Level every account starts at
    pub const STARTING_LEVEL: u32 = 1;
    /// Freeze tokens granted to a fresh progression record
    pub const STARTING_FREEZE_TOKENS: u32 = 2;
    /// Multiplier in `floor(30 * level^1.6)`
    pub const PROTEIN_BASE_GRAMS: f64 = 30.0;
    /// Exponent in `floor(30 * level^1.6)`
    pub const PROTEIN_EXPONENT: f64 = 1.6;
    /// Multiplier in `floor(level * 1.2)`
    pub const SCANS_PER_LEVEL: f64 = 1.2;
}

/// Daily goal defaults
pub mod goals {
    /// Default daily calorie goal
    pub const DEFAULT_DAILY_CALORIES: u32 = 2400;
    /// Share of the goal at which the day counts as reached
    pub const GOAL_REACHED_RATIO: f64 = 0.8;
}

/// Vision analysis defaults
pub mod analysis {
    /// Default Gemini model for meal analysis
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    /// Base URL for the Generative Language API
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Mime type sent with captured images
    pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
    /// Message shown for every failed analysis
    pub const USER_FACING_FAILURE: &str =
        "Failed to analyze image. Please try again with a clearer photo.";
    /// Instruction sent alongside the image
    pub const INSTRUCTION: &str = "Analyze this food image. Identify the primary food item and provide its estimated nutritional value per serving. Be precise with protein, fat, and carbs in grams. Provide a short, engaging fitness-focused description.";
}

/// Storage concurrency defaults
pub mod concurrency {
    /// Default number of compare-and-swap attempts per update
    pub const DEFAULT_CAS_MAX_RETRIES: u32 = 8;
}

/// Service identity used in logs
pub mod service_names {
    /// Name reported by the logging layer
    pub const CALIPPO: &str = "calippo";
}
