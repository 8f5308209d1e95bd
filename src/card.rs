use crate::scheduler::{ScheduledState, Stage};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Store-assigned card identifier
pub type CardId = i64;

/// A question/answer card with its review schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    pub created_at: NaiveDateTime,
    pub next_review: NaiveDateTime,
    pub stage: Stage,
    pub correct_count: u32,
}

impl Card {
    /// Due when `now` has reached the scheduled review time
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.next_review <= now
    }

    /// Current scheduling fields
    pub fn schedule(&self) -> ScheduledState {
        ScheduledState {
            stage: self.stage,
            correct_count: self.correct_count,
            next_review: self.next_review,
        }
    }
}
