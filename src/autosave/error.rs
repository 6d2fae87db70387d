use super::machine::{SaveEvent, SaveState};
use thiserror::Error;

pub type AutoSaveResult<T> = std::result::Result<T, AutoSaveError>;

#[derive(Debug, Error)]
pub enum AutoSaveError {
    #[error("invalid save transition: from {from:?} using event {event:?}")]
    InvalidTransition { from: SaveState, event: SaveEvent },
}
