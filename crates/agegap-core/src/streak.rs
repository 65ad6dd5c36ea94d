// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consecutive-day streak state machine.
//!
//! Transitions are keyed by whether the play was perfect and by the gap in
//! days between the submitted date and the last played date:
//!
//! | Prior            | Input     | Streak   | Best                          |
//! |------------------|-----------|----------|-------------------------------|
//! | none             | perfect   | 1        | 1                             |
//! | none             | imperfect | 0        | 0                             |
//! | gap = 0          | perfect   | unchanged| unchanged                     |
//! | gap = 1          | perfect   | prior+1  | max(best, prior+1)            |
//! | gap > 1 or < 0   | perfect   | 1        | max(best, prior streak, 1)    |
//! | any              | imperfect | 0        | max(best, prior streak)       |
//!
//! The last played date always moves to the submitted date. Storage
//! backends call [`advance`] inside their own transaction so the
//! read-modify-write is never split across round trips.

use chrono::NaiveDate;

use crate::types::StreakRecord;

/// Computes the record that results from a scored play.
///
/// `updated_at` is stamped onto the returned record verbatim.
pub fn advance(
    prior: Option<&StreakRecord>,
    client_id: &str,
    date: NaiveDate,
    perfect: bool,
    updated_at: String,
) -> StreakRecord {
    let (current_streak, best_streak) = match prior {
        None if perfect => (1, 1),
        None => (0, 0),
        Some(prev) => {
            let carried_best = prev.best_streak.max(prev.current_streak);
            if !perfect {
                (0, carried_best)
            } else {
                let streak = match gap_days(prev.last_played_date, date) {
                    0 => prev.current_streak,
                    1 => prev.current_streak + 1,
                    _ => 1,
                };
                (streak, carried_best.max(streak))
            }
        }
    };

    StreakRecord {
        client_id: client_id.to_string(),
        last_played_date: date,
        current_streak,
        best_streak,
        updated_at,
    }
}

/// Signed number of days from `last` to `date`.
pub fn gap_days(last: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(last).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn record(last: NaiveDate, streak: u32, best: u32) -> StreakRecord {
        StreakRecord {
            client_id: "c".to_string(),
            last_played_date: last,
            current_streak: streak,
            best_streak: best,
            updated_at: String::new(),
        }
    }

    fn play(prior: Option<&StreakRecord>, date: NaiveDate, perfect: bool) -> StreakRecord {
        advance(prior, "c", date, perfect, "t".to_string())
    }

    #[test]
    fn first_perfect_play_starts_streak() {
        let r = play(None, day(1), true);
        assert_eq!((r.current_streak, r.best_streak), (1, 1));
        assert_eq!(r.last_played_date, day(1));
    }

    #[test]
    fn first_imperfect_play_records_zero() {
        let r = play(None, day(1), false);
        assert_eq!((r.current_streak, r.best_streak), (0, 0));
        assert_eq!(r.last_played_date, day(1));
    }

    #[test]
    fn same_day_perfect_replay_is_idempotent() {
        let prev = record(day(3), 4, 6);
        let r = play(Some(&prev), day(3), true);
        assert_eq!((r.current_streak, r.best_streak), (4, 6));
    }

    #[test]
    fn next_day_perfect_extends_streak_and_best() {
        let prev = record(day(3), 4, 4);
        let r = play(Some(&prev), day(4), true);
        assert_eq!((r.current_streak, r.best_streak), (5, 5));
    }

    #[test]
    fn gap_resets_streak_but_keeps_best() {
        let prev = record(day(3), 4, 4);
        let r = play(Some(&prev), day(6), true);
        assert_eq!((r.current_streak, r.best_streak), (1, 4));
    }

    #[test]
    fn earlier_date_resets_streak() {
        let prev = record(day(10), 3, 3);
        let r = play(Some(&prev), day(9), true);
        assert_eq!((r.current_streak, r.best_streak), (1, 3));
        assert_eq!(r.last_played_date, day(9));
    }

    #[test]
    fn imperfect_play_zeroes_streak_and_banks_best() {
        let prev = record(day(3), 7, 5);
        let r = play(Some(&prev), day(4), false);
        assert_eq!((r.current_streak, r.best_streak), (0, 7));
        assert_eq!(r.last_played_date, day(4));
    }

    #[test]
    fn reset_after_zero_streak_lifts_best_to_one() {
        let prev = record(day(1), 0, 0);
        let r = play(Some(&prev), day(5), true);
        assert_eq!((r.current_streak, r.best_streak), (1, 1));
    }

    #[test]
    fn four_day_scenario() {
        let d1 = play(None, day(1), true);
        assert_eq!((d1.current_streak, d1.best_streak), (1, 1));
        let d2 = play(Some(&d1), day(2), true);
        assert_eq!((d2.current_streak, d2.best_streak), (2, 2));
        let d4 = play(Some(&d2), day(4), true);
        assert_eq!((d4.current_streak, d4.best_streak), (1, 2));
        let d5 = play(Some(&d4), day(5), false);
        assert_eq!((d5.current_streak, d5.best_streak), (0, 2));
    }

    proptest! {
        #[test]
        fn best_never_below_current(
            plays in proptest::collection::vec((0i64..4, any::<bool>()), 1..40)
        ) {
            let mut date = day(1);
            let mut state: Option<StreakRecord> = None;
            for (step, perfect) in plays {
                date += chrono::Duration::days(step);
                let next = play(state.as_ref(), date, perfect);
                prop_assert!(next.best_streak >= next.current_streak);
                if let Some(prev) = &state {
                    prop_assert!(next.best_streak >= prev.best_streak);
                }
                state = Some(next);
            }
        }
    }
}
