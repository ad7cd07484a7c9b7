// ABOUTME: Progression ledger: lifetime accumulators, streaks, XP, and evolution levels
// ABOUTME: Records scans into history and updates the per-user progression record atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Progression
//!
//! A recorded scan flows through three steps: the history store appends
//! the entry, then one compare-and-swap update of the user's progression
//! record adds the macros, moves the streak, awards XP, runs the level gate,
//! and celebrates any newly crossed badges. Everything in the second step is
//! a pure function of the previous record, so a lost race simply reruns it.

/// Badge evaluation
pub mod achievements;
/// Streak continuity and freeze tokens
pub mod streak;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::instrument;

pub use achievements::AchievementEvaluator;
pub use streak::{apply_scan, current_streak, StreakChange};

use crate::config::ProgressionConfig;
use crate::constants::progression::{MAX_LEVEL, XP_PER_SCAN};
use crate::database::{DocumentRepository, HistoryStore};
use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::models::{
    tier, Achievement, EvolutionTier, HistoryEntry, NutritionRecord, ProgressionState,
    StreakPolicy, UserId,
};
use crate::storage::factory::SharedStore;
use crate::storage::StorageKey;

/// Everything a recorded scan changed
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// The new history entry
    pub entry: HistoryEntry,
    /// New level, when the scan passed the level gate
    pub level_up: Option<u32>,
    /// Badges celebrated by this scan, lowest threshold first
    pub unlocked: Vec<Achievement>,
    /// Streak after the scan
    pub streak: u32,
    /// Progression record after the scan
    pub state: ProgressionState,
}

/// Progress toward the next evolution
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionProgress {
    /// Tier for the current level
    pub current: &'static EvolutionTier,
    /// Tier reached by the next level-up, `None` at the cap
    ///
    /// Its own requirements gate the level after it, not this level-up.
    pub next: Option<&'static EvolutionTier>,
    /// Tier whose requirements the next level-up must meet, `None` at the cap
    pub gate: Option<&'static EvolutionTier>,
    /// Lifetime protein required to level up
    pub protein_required: u64,
    /// Lifetime scans required to level up
    pub scans_required: u64,
    /// Share of the protein requirement met, clamped to `0..=1`
    pub protein_fraction: f64,
    /// Share of the scan requirement met, clamped to `0..=1`
    pub scans_fraction: f64,
    /// Whether both requirements are met
    pub can_evolve: bool,
}

fn fraction(have: f64, need: u64) -> f64 {
    if need == 0 {
        return 1.0;
    }
    (have / need as f64).clamp(0.0, 1.0)
}

/// Level gate for a state
///
/// The tier keyed by the current level holds the requirements for moving to
/// the next level; the cap has no gate.
fn gate(state: &ProgressionState) -> Option<&'static EvolutionTier> {
    if state.level >= MAX_LEVEL {
        return None;
    }
    tier(state.level)
}

fn gate_passed(state: &ProgressionState, gate: &EvolutionTier) -> bool {
    state.total_protein >= gate.required_protein as f64 && state.total_scans >= gate.required_scans
}

/// Progress of `state` toward its next level
#[must_use]
pub fn evolution_progress(state: &ProgressionState) -> Option<EvolutionProgress> {
    let current = tier(state.level.clamp(1, MAX_LEVEL))?;
    let Some(gate) = gate(state) else {
        return Some(EvolutionProgress {
            current,
            next: None,
            gate: None,
            protein_required: 0,
            scans_required: 0,
            protein_fraction: 1.0,
            scans_fraction: 1.0,
            can_evolve: false,
        });
    };
    Some(EvolutionProgress {
        current,
        next: tier(state.level + 1),
        gate: Some(gate),
        protein_required: gate.required_protein,
        scans_required: gate.required_scans,
        protein_fraction: fraction(state.total_protein, gate.required_protein),
        scans_fraction: fraction(state.total_scans as f64, gate.required_scans),
        can_evolve: gate_passed(state, gate),
    })
}

/// Fold one analysed meal into `state`
///
/// Adds the macros, moves the streak, awards the flat scan XP, and raises
/// the level by at most one. Returns the new level on a level-up.
pub fn accumulate(
    state: &mut ProgressionState,
    record: &NutritionRecord,
    policy: StreakPolicy,
    at: DateTime<Utc>,
) -> Option<u32> {
    state.total_scans = state.total_scans.saturating_add(1);
    state.total_protein += record.counted_protein();
    state.total_carbs += record.counted_carbs();
    state.total_fats += record.counted_fat();

    apply_scan(state, policy, at);
    state.xp = state.xp.saturating_add(XP_PER_SCAN);

    let gate = gate(state)?;
    if gate_passed(state, gate) {
        state.level += 1;
        Some(state.level)
    } else {
        None
    }
}

/// Per-user progression ledger
#[derive(Clone)]
pub struct ProgressionLedger {
    store: SharedStore,
    max_attempts: u32,
    history: HistoryStore,
    streak_policy: StreakPolicy,
    evaluator: AchievementEvaluator,
}

impl ProgressionLedger {
    /// Create a ledger recording into `history`
    #[must_use]
    pub fn new(
        store: SharedStore,
        history: HistoryStore,
        config: ProgressionConfig,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            max_attempts,
            history,
            streak_policy: config.streak_policy,
            evaluator: AchievementEvaluator::new(config.achievement_policy),
        }
    }

    fn stats(&self, user: &UserId) -> DocumentRepository<ProgressionState> {
        DocumentRepository::new(
            self.store.clone(),
            StorageKey::Stats(user.clone()).as_key(),
            self.max_attempts,
        )
    }

    /// History store the ledger appends to
    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Progression record of `user`, defaults when never written
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read
    pub async fn state(&self, user: &UserId) -> AppResult<ProgressionState> {
        Ok(self
            .stats(user)
            .get()
            .await?
            .map(|snapshot| snapshot.value)
            .unwrap_or_default())
    }

    /// Streak of `user` as it stands on `today`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read
    pub async fn current_streak(&self, user: &UserId, today: NaiveDate) -> AppResult<u32> {
        Ok(current_streak(&self.state(user).await?, today))
    }

    /// Record an analysed meal for `user`
    ///
    /// # Errors
    ///
    /// Returns an error if history or the progression record cannot be
    /// written
    #[instrument(skip(self, record, image), fields(food = %record.food_name))]
    pub async fn record_scan(
        &self,
        user: &UserId,
        record: NutritionRecord,
        image: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<ScanOutcome> {
        let (entry, history_len) = self.history.append(user, record, image, at).await?;
        let policy = self.streak_policy;
        let evaluator = self.evaluator;
        let (level_up, unlocked, state) = self
            .stats(user)
            .update(|state| {
                let level_up = accumulate(state, &entry.data, policy, at);
                let unlocked = evaluator.evaluate(history_len, state);
                Ok((level_up, unlocked, state.clone()))
            })
            .await?;

        AppLogger::log_scan_recorded(
            user.as_str(),
            &entry.data.food_name,
            state.total_scans,
            state.streak,
        );
        if let Some(level) = level_up {
            let creature = tier(level).map_or("", |tier| tier.name.as_str());
            AppLogger::log_level_up(user.as_str(), level, creature);
        }
        for badge in &unlocked {
            AppLogger::log_achievement_unlocked(user.as_str(), badge.name, badge.xp);
        }

        Ok(ScanOutcome {
            entry,
            level_up,
            unlocked,
            streak: state.streak,
            state,
        })
    }

    /// Run the achievement evaluator against the current history length
    ///
    /// # Errors
    ///
    /// Returns an error if history or the progression record cannot be
    /// accessed
    pub async fn evaluate_achievements(&self, user: &UserId) -> AppResult<Vec<Achievement>> {
        let history_len = self.history.len(user).await?;
        self.celebrate(user, history_len).await
    }

    async fn celebrate(&self, user: &UserId, history_len: usize) -> AppResult<Vec<Achievement>> {
        let evaluator = self.evaluator;
        if AchievementEvaluator::pending(history_len, &self.state(user).await?).is_empty() {
            return Ok(Vec::new());
        }
        let unlocked = self
            .stats(user)
            .update(|state| Ok(evaluator.evaluate(history_len, state)))
            .await?;
        for badge in &unlocked {
            AppLogger::log_achievement_unlocked(user.as_str(), badge.name, badge.xp);
        }
        Ok(unlocked)
    }

    /// Delete one history entry and re-evaluate badges
    ///
    /// Lifetime accumulators keep the deleted meal. Returns `None` when the
    /// entry did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if history or the progression record cannot be
    /// written
    pub async fn delete_entry(
        &self,
        user: &UserId,
        entry_id: &str,
    ) -> AppResult<Option<Vec<Achievement>>> {
        let Some(history_len) = self.history.delete(user, entry_id).await? else {
            return Ok(None);
        };
        Ok(Some(self.celebrate(user, history_len).await?))
    }

    /// Delete the whole history and re-evaluate badges
    ///
    /// # Errors
    ///
    /// Returns an error if history or the progression record cannot be
    /// written
    pub async fn clear_history(&self, user: &UserId) -> AppResult<usize> {
        let removed = self.history.clear(user).await?;
        self.celebrate(user, 0).await?;
        Ok(removed)
    }

    /// Drop the progression record of `user`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed
    pub async fn reset(&self, user: &UserId) -> AppResult<bool> {
        self.stats(user).remove().await
    }
}
