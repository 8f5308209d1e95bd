use chrono::{Duration, NaiveDateTime, SubsecRound};
use serde::Serialize;
use std::fmt;

/// Minutes until the next review, indexed by stage
pub const INTERVAL_MINUTES: [i64; 5] = [
    20,     // 20 minutes
    60,     // 1 hour
    1_440,  // 1 day
    8_640,  // 6 days
    43_200, // 30 days
];

/// Position on the review ladder, always within 0..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Stage(u8);

impl Stage {
    /// Stage of a freshly created card
    pub const INITIAL: Stage = Stage(0);
    /// Top of the ladder
    pub const MAX: Stage = Stage(INTERVAL_MINUTES.len() as u8 - 1);

    /// Returns `None` when `value` is off the ladder
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX.0).then_some(Stage(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One step up, pinned at the top
    pub fn advance(self) -> Self {
        Stage((self.0 + 1).min(Self::MAX.0))
    }

    /// One step down, pinned at the bottom
    pub fn retreat(self) -> Self {
        Stage(self.0.saturating_sub(1))
    }

    pub fn interval_minutes(self) -> i64 {
        INTERVAL_MINUTES[self.0 as usize]
    }

    pub fn interval(self) -> Duration {
        Duration::minutes(self.interval_minutes())
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's verdict on a presented card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Incorrect,
}

impl Answer {
    pub fn is_correct(self) -> bool {
        self == Answer::Correct
    }
}

impl From<bool> for Answer {
    fn from(is_correct: bool) -> Self {
        if is_correct {
            Answer::Correct
        } else {
            Answer::Incorrect
        }
    }
}

/// Scheduling fields written back to a card after a review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledState {
    pub stage: Stage,
    pub correct_count: u32,
    pub next_review: NaiveDateTime,
}

/// Compute the next scheduling state for a card.
///
/// A correct answer moves one stage up and adds one to the running count; an
/// incorrect one moves one stage down and takes one away. Both ends of the
/// ladder are absorbing and the count never drops below zero. The next
/// review falls exactly one interval of the *new* stage after `now`, counted
/// from the whole second.
///
/// Returns `None` when that review time is past the end of the calendar.
pub fn next_state(
    stage: Stage,
    correct_count: u32,
    answer: Answer,
    now: NaiveDateTime,
) -> Option<ScheduledState> {
    let (stage, correct_count) = match answer {
        Answer::Correct => (stage.advance(), correct_count.saturating_add(1)),
        Answer::Incorrect => (stage.retreat(), correct_count.saturating_sub(1)),
    };

    let next_review = now.trunc_subsecs(0).checked_add_signed(stage.interval())?;

    Some(ScheduledState {
        stage,
        correct_count,
        next_review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_timestamp;

    fn t0() -> NaiveDateTime {
        parse_timestamp("2024-05-01 09:00:00").unwrap()
    }

    fn all_stages() -> impl Iterator<Item = Stage> {
        (0..=4).map(|s| Stage::new(s).unwrap())
    }

    #[test]
    fn test_stage_bounds() {
        assert_eq!(Stage::new(0), Some(Stage::INITIAL));
        assert_eq!(Stage::new(4), Some(Stage::MAX));
        assert_eq!(Stage::new(5), None);
        assert_eq!(Stage::default(), Stage::INITIAL);
    }

    #[test]
    fn test_interval_table() {
        let minutes: Vec<i64> = all_stages().map(Stage::interval_minutes).collect();
        assert_eq!(minutes, vec![20, 60, 1440, 8640, 43200]);
    }

    #[test]
    fn test_correct_advances_stage() {
        for stage in all_stages() {
            let next = next_state(stage, 3, Answer::Correct, t0()).unwrap();
            assert_eq!(next.stage.value(), (stage.value() + 1).min(4));
        }
    }

    #[test]
    fn test_incorrect_retreats_stage() {
        for stage in all_stages() {
            let next = next_state(stage, 3, Answer::Incorrect, t0()).unwrap();
            assert_eq!(next.stage.value(), stage.value().saturating_sub(1));
        }
    }

    #[test]
    fn test_correct_count_moves_by_one() {
        for count in [0u32, 1, 2, 17] {
            let up = next_state(Stage::INITIAL, count, Answer::Correct, t0()).unwrap();
            assert_eq!(up.correct_count, count + 1);

            let down = next_state(Stage::INITIAL, count, Answer::Incorrect, t0()).unwrap();
            assert_eq!(down.correct_count, count.saturating_sub(1));
        }
    }

    #[test]
    fn test_next_review_uses_new_stage_interval() {
        for stage in all_stages() {
            for answer in [Answer::Correct, Answer::Incorrect] {
                let next = next_state(stage, 0, answer, t0()).unwrap();
                let expected = t0() + Duration::minutes(next.stage.interval_minutes());
                assert_eq!(next.next_review, expected);
            }
        }
    }

    #[test]
    fn test_failures_at_floor_stay_pinned() {
        let mut stage = Stage::INITIAL;
        let mut count = 0;
        for _ in 0..5 {
            let next = next_state(stage, count, Answer::Incorrect, t0()).unwrap();
            assert_eq!(next.stage, Stage::INITIAL);
            assert_eq!(next.correct_count, 0);
            assert_eq!(next.next_review, t0() + Duration::minutes(20));
            stage = next.stage;
            count = next.correct_count;
        }
    }

    #[test]
    fn test_successes_at_ceiling_stay_pinned() {
        let mut stage = Stage::MAX;
        let mut count = 10;
        for i in 1..=3 {
            let next = next_state(stage, count, Answer::Correct, t0()).unwrap();
            assert_eq!(next.stage, Stage::MAX);
            assert_eq!(next.correct_count, 10 + i);
            assert_eq!(next.next_review, t0() + Duration::minutes(43_200));
            stage = next.stage;
            count = next.correct_count;
        }
    }

    #[test]
    fn test_two_plus_two_walkthrough() {
        let t1 = t0() + Duration::minutes(90);
        let t2 = t1 + Duration::days(2);

        let first = next_state(Stage::INITIAL, 0, Answer::Correct, t0()).unwrap();
        assert_eq!(first.stage.value(), 1);
        assert_eq!(first.correct_count, 1);
        assert_eq!(first.next_review, t0() + Duration::minutes(60));

        let second = next_state(first.stage, first.correct_count, Answer::Correct, t1).unwrap();
        assert_eq!(second.stage.value(), 2);
        assert_eq!(second.correct_count, 2);
        assert_eq!(second.next_review, t1 + Duration::minutes(1440));

        let third = next_state(second.stage, second.correct_count, Answer::Incorrect, t2).unwrap();
        assert_eq!(third.stage.value(), 1);
        assert_eq!(third.correct_count, 1);
        assert_eq!(third.next_review, t2 + Duration::minutes(60));
    }

    #[test]
    fn test_subsecond_now_is_dropped() {
        let now = t0() + Duration::milliseconds(750);
        let next = next_state(Stage::INITIAL, 0, Answer::Correct, now).unwrap();
        assert_eq!(next.next_review, t0() + Duration::minutes(60));
    }

    #[test]
    fn test_overflowing_review_time() {
        let far = NaiveDateTime::MAX - Duration::minutes(30);
        assert!(next_state(Stage::INITIAL, 0, Answer::Incorrect, far).is_some());
        assert!(next_state(Stage::INITIAL, 0, Answer::Correct, far).is_none());
    }

    #[test]
    fn test_answer_from_bool() {
        assert_eq!(Answer::from(true), Answer::Correct);
        assert_eq!(Answer::from(false), Answer::Incorrect);
        assert!(Answer::Correct.is_correct());
        assert!(!Answer::Incorrect.is_correct());
    }
}
