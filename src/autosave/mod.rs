//! Debounced auto-save: `idle → dirty → saving → (saved → idle) | (error → dirty)`.

mod clock;
mod coordinator;
mod error;
mod machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{
    AutoSaveCoordinator, AutoSaveSettings, SaveMode, SaveRequest, SaveTicket, DEFAULT_DEBOUNCE,
    DEFAULT_SAVED_CONFIRMATION,
};
pub use error::{AutoSaveError, AutoSaveResult};
pub use machine::{SaveEvent, SaveState, SaveStateMachine, SaveTransition, HISTORY_LIMIT};
