// ABOUTME: Streak engine: day continuity, freeze-token consumption, and streak breaks
// ABOUTME: Pure functions over ProgressionState so the ledger can run them inside a CAS retry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::models::{DayStatus, ProgressionState, StreakPolicy};

/// What a scan did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// First scan ever
    Started,
    /// Another scan on an already counted day
    SameDay,
    /// Scan on the day after the last active day
    Extended,
    /// Missed days were covered by freeze tokens
    Frozen {
        /// Tokens spent
        tokens_used: u32,
    },
    /// Too many missed days; the streak restarted at 1
    Broken {
        /// Streak length before the break
        previous: u32,
    },
    /// Lenient policy: counted without checking dates
    Counted,
}

/// Days strictly between `last` and `today`
fn missed_days(last: NaiveDate, today: NaiveDate) -> i64 {
    (today - last).num_days() - 1
}

/// Apply one scan at `at` to the streak fields of `state`
///
/// Marks the scan day as `streak`, moves `last_activity` forward, and
/// updates `streak` and `freeze_count` according to `policy`.
pub fn apply_scan(
    state: &mut ProgressionState,
    policy: StreakPolicy,
    at: DateTime<Utc>,
) -> StreakChange {
    let today = at.date_naive();
    let last = state.last_active_day();

    let change = match policy {
        StreakPolicy::Lenient => {
            state.streak = state.streak.saturating_add(1);
            StreakChange::Counted
        }
        StreakPolicy::Consecutive => match last {
            None => {
                state.streak = 1;
                StreakChange::Started
            }
            Some(last) if today <= last => {
                // also covers a clock that moved backwards
                state.streak = state.streak.max(1);
                StreakChange::SameDay
            }
            Some(last) => bridge_gap(state, last, today),
        },
    };

    state.streak_history.insert(today, DayStatus::Streak);
    if state.last_activity.is_none_or(|previous| at > previous) {
        state.last_activity = Some(at);
    }
    change
}

fn bridge_gap(state: &mut ProgressionState, last: NaiveDate, today: NaiveDate) -> StreakChange {
    let missed = missed_days(last, today);
    if missed <= 0 {
        state.streak = state.streak.saturating_add(1);
        return StreakChange::Extended;
    }

    let missed_u32 = u32::try_from(missed).unwrap_or(u32::MAX);
    if state.freeze_count >= missed_u32 {
        let mut day = last;
        for _ in 0..missed_u32 {
            let Some(next) = day.checked_add_days(Days::new(1)) else {
                break;
            };
            state.streak_history.insert(next, DayStatus::Freeze);
            day = next;
        }
        state.freeze_count -= missed_u32;
        state.streak = state.streak.saturating_add(1);
        return StreakChange::Frozen {
            tokens_used: missed_u32,
        };
    }

    let previous = state.streak;
    if let Some(first_missed) = last.checked_add_days(Days::new(1)) {
        state.streak_history.insert(first_missed, DayStatus::Broken);
    }
    state.streak = 1;
    StreakChange::Broken { previous }
}

/// Streak as it stands on `today`
///
/// A streak whose gap since the last scan can no longer be covered by the
/// remaining freeze tokens reads as 0, even before the next scan rewrites
/// the stored value.
#[must_use]
pub fn current_streak(state: &ProgressionState, today: NaiveDate) -> u32 {
    let Some(last) = state.last_active_day() else {
        return 0;
    };
    let missed = missed_days(last, today);
    if missed <= 0 || u32::try_from(missed).is_ok_and(|missed| missed <= state.freeze_count) {
        state.streak
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    #[test]
    fn test_same_day_does_not_increment() {
        let mut state = ProgressionState::default();
        assert_eq!(apply_scan(&mut state, StreakPolicy::Consecutive, at(1)), StreakChange::Started);
        assert_eq!(apply_scan(&mut state, StreakPolicy::Consecutive, at(1)), StreakChange::SameDay);
        assert_eq!(state.streak, 1);
    }

    #[test]
    fn test_next_day_extends() {
        let mut state = ProgressionState::default();
        apply_scan(&mut state, StreakPolicy::Consecutive, at(1));
        apply_scan(&mut state, StreakPolicy::Consecutive, at(2));
        assert_eq!(state.streak, 2);
        assert_eq!(state.day_status(date(2)), Some(DayStatus::Streak));
    }

    #[test]
    fn test_gap_consumes_freezes() {
        let mut state = ProgressionState::default();
        apply_scan(&mut state, StreakPolicy::Consecutive, at(1));
        let change = apply_scan(&mut state, StreakPolicy::Consecutive, at(4));
        assert_eq!(change, StreakChange::Frozen { tokens_used: 2 });
        assert_eq!(state.streak, 2);
        assert_eq!(state.freeze_count, 0);
        assert_eq!(state.day_status(date(2)), Some(DayStatus::Freeze));
        assert_eq!(state.day_status(date(3)), Some(DayStatus::Freeze));
    }

    #[test]
    fn test_gap_too_long_breaks() {
        let mut state = ProgressionState::default();
        apply_scan(&mut state, StreakPolicy::Consecutive, at(1));
        apply_scan(&mut state, StreakPolicy::Consecutive, at(2));
        let change = apply_scan(&mut state, StreakPolicy::Consecutive, at(6));
        assert_eq!(change, StreakChange::Broken { previous: 2 });
        assert_eq!(state.streak, 1);
        assert_eq!(state.freeze_count, 2);
        assert_eq!(state.day_status(date(3)), Some(DayStatus::Broken));
        assert_eq!(state.day_status(date(6)), Some(DayStatus::Streak));
    }

    #[test]
    fn test_lenient_counts_every_scan() {
        let mut state = ProgressionState::default();
        apply_scan(&mut state, StreakPolicy::Lenient, at(1));
        apply_scan(&mut state, StreakPolicy::Lenient, at(1));
        apply_scan(&mut state, StreakPolicy::Lenient, at(9));
        assert_eq!(state.streak, 3);
        assert_eq!(state.freeze_count, 2);
    }

    #[test]
    fn test_current_streak_expires() {
        let mut state = ProgressionState::default();
        apply_scan(&mut state, StreakPolicy::Consecutive, at(1));
        assert_eq!(current_streak(&state, date(1)), 1);
        assert_eq!(current_streak(&state, date(2)), 1);
        assert_eq!(current_streak(&state, date(4)), 1);
        assert_eq!(current_streak(&state, date(5)), 0);
        assert_eq!(current_streak(&ProgressionState::default(), date(5)), 0);
    }
}
