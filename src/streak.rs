//! Consecutive-day streak rules.
//!
//! Applied exactly once per calendar day per user; the engine only calls
//! [`StreakState::advance`] for the first completion of a day, so a second
//! activity on a two-slot tier never double-credits.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_completed_on: Option<NaiveDate>,
}

impl StreakState {
    /// The streak after crediting `today`:
    /// no prior completion → 1; gap of one day → continue; gap greater
    /// than one → a fresh streak of 1 starts immediately; gap of zero
    /// (or a completion recorded for an earlier date) → unchanged.
    pub fn advance(&self, today: NaiveDate) -> StreakState {
        let current = match self.last_completed_on {
            None => 1,
            Some(last) => {
                let gap = (today - last).num_days();
                if gap == 0 {
                    return *self;
                } else if gap == 1 {
                    self.current + 1
                } else if gap > 1 {
                    1
                } else {
                    return *self;
                }
            }
        };

        StreakState {
            current,
            longest: self.longest.max(current),
            last_completed_on: Some(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn first_ever_completion_starts_at_one() {
        let state = StreakState {
            current: 0,
            longest: 0,
            last_completed_on: None,
        };
        let next = state.advance(day(1));
        assert_eq!(next.current, 1);
        assert_eq!(next.longest, 1);
        assert_eq!(next.last_completed_on, Some(day(1)));
    }

    #[test]
    fn consecutive_days_increment() {
        let mut state = StreakState {
            current: 0,
            longest: 0,
            last_completed_on: None,
        };
        state = state.advance(day(1));
        state = state.advance(day(2));
        assert_eq!(state.current, 2);
        assert_eq!(state.longest, 2);
    }

    #[test]
    fn skipping_a_day_resets_to_one_not_zero() {
        let mut state = StreakState {
            current: 0,
            longest: 0,
            last_completed_on: None,
        };
        state = state.advance(day(1));
        state = state.advance(day(2));
        // Day 3 skipped.
        state = state.advance(day(4));
        assert_eq!(state.current, 1);
        assert_eq!(state.longest, 2);
        assert_eq!(state.last_completed_on, Some(day(4)));
    }

    #[test]
    fn same_day_is_a_no_op() {
        let state = StreakState {
            current: 5,
            longest: 7,
            last_completed_on: Some(day(10)),
        };
        assert_eq!(state.advance(day(10)), state);
    }

    #[test]
    fn earlier_date_leaves_the_streak_alone() {
        let state = StreakState {
            current: 5,
            longest: 7,
            last_completed_on: Some(day(10)),
        };
        assert_eq!(state.advance(day(8)), state);
    }

    #[test]
    fn longest_survives_a_reset() {
        let mut state = StreakState {
            current: 0,
            longest: 0,
            last_completed_on: None,
        };
        for d in 1..=6 {
            state = state.advance(day(d));
        }
        assert_eq!(state.longest, 6);
        state = state.advance(day(20));
        assert_eq!(state.current, 1);
        assert_eq!(state.longest, 6);
    }
}
