// ABOUTME: Nutrition models for analyzed meals and scan history
// ABOUTME: NutritionRecord, HistoryEntry, daily macro totals, and side-by-side comparisons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::goals;

/// Structured result of one meal analysis
///
/// Field names match the analysis response schema exactly; every field is
/// required when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    /// Primary food item
    pub food_name: String,
    /// Estimated calories per serving
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Short fitness-focused description
    pub description: String,
    /// Health score, nominally 0-100 (not enforced)
    pub health_score: f64,
}

/// Treat negative or non-finite amounts as zero contribution
#[must_use]
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl NutritionRecord {
    /// Protein counted toward lifetime totals
    #[must_use]
    pub fn counted_protein(&self) -> f64 {
        non_negative(self.protein)
    }

    /// Carbohydrates counted toward lifetime totals
    #[must_use]
    pub fn counted_carbs(&self) -> f64 {
        non_negative(self.carbs)
    }

    /// Fat counted toward lifetime totals
    #[must_use]
    pub fn counted_fat(&self) -> f64 {
        non_negative(self.fat)
    }

    /// Calories counted toward daily totals
    #[must_use]
    pub fn counted_calories(&self) -> f64 {
        non_negative(self.calories)
    }
}

/// One recorded scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier, unique within the owner's history
    pub id: String,
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// Analysis result
    pub data: NutritionRecord,
    /// Optional reference to the captured image
    #[serde(default)]
    pub image: Option<String>,
}

impl HistoryEntry {
    /// Create an entry with a fresh identifier
    #[must_use]
    pub fn new(data: NutritionRecord, image: Option<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            timestamp,
            data,
            image,
        }
    }

    /// UTC calendar day of the capture
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Summed macros for a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fats: f64,
    /// Calories
    pub calories: f64,
    /// Number of entries summed
    pub entries: usize,
}

impl MacroTotals {
    /// Sum the given entries
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |acc, entry| Self {
            protein: acc.protein + entry.data.counted_protein(),
            carbs: acc.carbs + entry.data.counted_carbs(),
            fats: acc.fats + entry.data.counted_fat(),
            calories: acc.calories + entry.data.counted_calories(),
            entries: acc.entries + 1,
        })
    }
}

/// Totals for one day measured against the calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Day being reported
    pub day: NaiveDate,
    /// Summed macros for the day
    pub totals: MacroTotals,
    /// Daily calorie goal
    pub calorie_goal: u32,
}

impl DailyProgress {
    /// Whether calories reached 80% of the goal
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.totals.calories >= f64::from(self.calorie_goal) * goals::GOAL_REACHED_RATIO
    }

    /// Calories still available under the goal (never negative)
    #[must_use]
    pub fn calories_remaining(&self) -> f64 {
        (f64::from(self.calorie_goal) - self.totals.calories).max(0.0)
    }
}

/// Macro compared across selected entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparedMacro {
    /// Protein grams
    Protein,
    /// Carbohydrate grams
    Carbs,
    /// Fat grams
    Fat,
}

/// One metric row of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Metric of this row
    pub metric: ComparedMacro,
    /// `(food name, grams)` per selected entry, in selection order
    pub values: Vec<(String, f64)>,
}

/// Grouped comparison of macros across several scans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroComparison {
    /// Protein, carbs and fat rows
    pub rows: Vec<ComparisonRow>,
}

impl MacroComparison {
    /// Build the three metric rows for the given entries
    #[must_use]
    pub fn from_entries(entries: &[&HistoryEntry]) -> Self {
        let row = |metric: ComparedMacro| ComparisonRow {
            metric,
            values: entries
                .iter()
                .map(|entry| {
                    let grams = match metric {
                        ComparedMacro::Protein => entry.data.protein,
                        ComparedMacro::Carbs => entry.data.carbs,
                        ComparedMacro::Fat => entry.data.fat,
                    };
                    (entry.data.food_name.clone(), grams)
                })
                .collect(),
        };
        Self {
            rows: vec![
                row(ComparedMacro::Protein),
                row(ComparedMacro::Carbs),
                row(ComparedMacro::Fat),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(protein: f64, calories: f64) -> NutritionRecord {
        NutritionRecord {
            food_name: "Oats".to_owned(),
            calories,
            protein,
            carbs: 10.0,
            fat: 2.0,
            description: "Slow carbs".to_owned(),
            health_score: 80.0,
        }
    }

    #[test]
    fn test_negative_and_nan_count_as_zero() {
        let mut meal = record(-5.0, 100.0);
        meal.fat = f64::NAN;
        assert!(meal.counted_protein().abs() < f64::EPSILON);
        assert!(meal.counted_fat().abs() < f64::EPSILON);
        assert!((meal.counted_carbs() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_requires_every_field() {
        let missing_score = r#"{"foodName":"Egg","calories":70,"protein":6,"carbs":0,"fat":5,"description":"x"}"#;
        assert!(serde_json::from_str::<NutritionRecord>(missing_score).is_err());
    }

    #[test]
    fn test_goal_reached_at_eighty_percent() {
        let now = Utc::now();
        let entries = [HistoryEntry::new(record(20.0, 1920.0), None, now)];
        let progress = DailyProgress {
            day: now.date_naive(),
            totals: MacroTotals::from_entries(entries.iter()),
            calorie_goal: 2400,
        };
        assert!(progress.goal_reached());
        assert!((progress.calories_remaining() - 480.0).abs() < 1e-9);
    }
}
