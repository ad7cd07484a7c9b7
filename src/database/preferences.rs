// ABOUTME: Device preferences: daily calorie goal and theme
// ABOUTME: Scalar values stored under fixed keys with defaults when absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::repository::DocumentRepository;
use crate::constants::goals::DEFAULT_DAILY_CALORIES;
use crate::errors::{AppError, AppResult};
use crate::storage::factory::SharedStore;
use crate::storage::StorageKey;

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(AppError::invalid_input(format!("Invalid theme: {s}"))),
        }
    }
}

/// Daily goal and theme for this device
#[derive(Clone)]
pub struct Preferences {
    daily_goal: DocumentRepository<u32>,
    theme: DocumentRepository<Theme>,
}

impl Preferences {
    /// Create preferences over `store`
    #[must_use]
    pub fn new(store: SharedStore, max_attempts: u32) -> Self {
        Self {
            daily_goal: DocumentRepository::new(
                store.clone(),
                StorageKey::DailyGoal.as_key(),
                max_attempts,
            ),
            theme: DocumentRepository::new(store, StorageKey::Theme.as_key(), max_attempts),
        }
    }

    /// Daily calorie goal, 2400 when never set
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read
    pub async fn daily_goal(&self) -> AppResult<u32> {
        Ok(self
            .daily_goal
            .get()
            .await?
            .map_or(DEFAULT_DAILY_CALORIES, |snapshot| snapshot.value))
    }

    /// Set the daily calorie goal
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero goal
    pub async fn set_daily_goal(&self, calories: u32) -> AppResult<()> {
        if calories == 0 {
            return Err(AppError::invalid_input(
                "Daily calorie goal must be greater than 0",
            ));
        }
        self.daily_goal.put(&calories).await?;
        Ok(())
    }

    /// Current theme, light when never set
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read
    pub async fn theme(&self) -> AppResult<Theme> {
        Ok(self
            .theme
            .get()
            .await?
            .map(|snapshot| snapshot.value)
            .unwrap_or_default())
    }

    /// Persist a theme
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written
    pub async fn set_theme(&self, theme: Theme) -> AppResult<()> {
        self.theme.put(&theme).await?;
        Ok(())
    }

    /// Flip the theme and return the new one
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be read or written
    pub async fn toggle_theme(&self) -> AppResult<Theme> {
        self.theme
            .update(|theme| {
                *theme = theme.toggled();
                Ok(*theme)
            })
            .await
    }
}
