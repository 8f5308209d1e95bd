use crate::card::CardId;

/// Errors surfaced by the card store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Card not found: {0}")]
    NotFound(CardId),

    #[error("Next review for card {0} is out of range")]
    ReviewOutOfRange(CardId),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
