//! Question/answer flashcards scheduled on a fixed five-step review ladder.

pub mod card;
pub mod clock;
pub mod config;
pub mod error;
pub mod review;
pub mod scheduler;
pub mod storage;

pub use card::{Card, CardId};
pub use error::StoreError;
pub use scheduler::{Answer, ScheduledState, Stage};
pub use storage::Storage;
