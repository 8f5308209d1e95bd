//! Operations the presentation layer drives: add a card, list what is due,
//! and record a verdict.
//!
//! Every call takes the store handle explicitly and runs to completion before
//! returning; the caller re-queries due cards afterwards to refresh its view.

use crate::card::{Card, CardId};
use crate::error::{Result, StoreError};
use crate::scheduler::{Answer, ScheduledState, next_state};
use crate::storage::Storage;
use chrono::NaiveDateTime;

pub fn create_card(
    storage: &Storage,
    question: &str,
    answer: &str,
    now: NaiveDateTime,
) -> Result<CardId> {
    storage.create_card(question, answer, now)
}

pub fn list_due_cards(storage: &Storage, now: NaiveDateTime) -> Result<Vec<Card>> {
    storage.due_cards(now)
}

/// Schedule a card from the user's verdict and persist the result.
///
/// Fails with [`StoreError::NotFound`] when no card has `card_id`, and with
/// [`StoreError::ReviewOutOfRange`] when the next review cannot be represented.
/// The returned state is exactly what was stored.
pub fn record_answer(
    storage: &Storage,
    card_id: CardId,
    answer: Answer,
    now: NaiveDateTime,
) -> Result<ScheduledState> {
    let card = storage
        .get_card(card_id)?
        .ok_or(StoreError::NotFound(card_id))?;

    let state = next_state(card.stage, card.correct_count, answer, now)
        .ok_or(StoreError::ReviewOutOfRange(card_id))?;
    storage.apply_update(card_id, state)?;

    Ok(state)
}
