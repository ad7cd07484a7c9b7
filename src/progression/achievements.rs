// ABOUTME: Achievement evaluator over the static badge table
// ABOUTME: Marks and credits newly crossed scan-count thresholds exactly once each
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{Achievement, AchievementPolicy, ProgressionState, BADGES};

/// Badge evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementEvaluator {
    policy: AchievementPolicy,
}

impl AchievementEvaluator {
    /// Create an evaluator with `policy`
    #[must_use]
    pub const fn new(policy: AchievementPolicy) -> Self {
        Self { policy }
    }

    /// Configured policy
    #[must_use]
    pub const fn policy(&self) -> AchievementPolicy {
        self.policy
    }

    /// Badges crossed at `history_len` that have not been celebrated yet
    #[must_use]
    pub fn pending(history_len: usize, state: &ProgressionState) -> Vec<&'static Achievement> {
        BADGES
            .iter()
            .filter(|badge| {
                badge.threshold <= history_len && !state.celebrated_badge_names.contains(badge.name)
            })
            .collect()
    }

    /// Celebrate newly crossed badges
    ///
    /// Each returned badge has been added to the celebrated set and its XP
    /// credited. The result is ordered lowest threshold first, so the first
    /// element is the headline notification. Calling again with the same
    /// `history_len` returns nothing under `AwardAll`.
    pub fn evaluate(&self, history_len: usize, state: &mut ProgressionState) -> Vec<Achievement> {
        let mut crossed = Self::pending(history_len, state);
        if self.policy == AchievementPolicy::OneAtATime {
            crossed.truncate(1);
        }
        crossed
            .into_iter()
            .map(|badge| {
                state.celebrated_badge_names.insert(badge.name.to_owned());
                state.xp = state.xp.saturating_add(badge.xp);
                *badge
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_all_credits_every_crossed_badge() {
        let evaluator = AchievementEvaluator::new(AchievementPolicy::AwardAll);
        let mut state = ProgressionState::default();
        let unlocked = evaluator.evaluate(5, &mut state);
        let names: Vec<_> = unlocked.iter().map(|badge| badge.name).collect();
        assert_eq!(names, ["First Bite", "Curious Eater", "Snack Tracker"]);
        assert_eq!(state.xp, 50 + 75 + 100);
    }

    #[test]
    fn test_one_at_a_time_defers_the_rest() {
        let evaluator = AchievementEvaluator::new(AchievementPolicy::OneAtATime);
        let mut state = ProgressionState::default();
        assert_eq!(evaluator.evaluate(5, &mut state)[0].name, "First Bite");
        assert_eq!(evaluator.evaluate(5, &mut state)[0].name, "Curious Eater");
        assert_eq!(evaluator.evaluate(5, &mut state)[0].name, "Snack Tracker");
        assert!(evaluator.evaluate(5, &mut state).is_empty());
        assert_eq!(state.xp, 225);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = AchievementEvaluator::default();
        let mut state = ProgressionState::default();
        evaluator.evaluate(3, &mut state);
        let xp = state.xp;
        assert!(evaluator.evaluate(3, &mut state).is_empty());
        assert_eq!(state.xp, xp);
        assert_eq!(state.celebrated_badge_names.len(), 2);
    }

    #[test]
    fn test_nothing_below_first_threshold() {
        let mut state = ProgressionState::default();
        assert!(AchievementEvaluator::default().evaluate(0, &mut state).is_empty());
        assert_eq!(state.xp, 0);
    }
}
