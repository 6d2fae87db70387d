use serde::Serialize;

use super::error::{AutoSaveError, AutoSaveResult};

/// Transitions kept for inspection; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    #[default]
    Idle,
    Dirty,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent {
    Edit,
    DebounceElapsed,
    SaveSucceeded,
    SaveFailed,
    ConfirmationElapsed,
    Retry,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTransition {
    pub from: SaveState,
    pub event: SaveEvent,
    pub to: SaveState,
}

#[derive(Debug, Default)]
pub struct SaveStateMachine {
    state: SaveState,
    transition_history: Vec<SaveTransition>,
}

impl SaveStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn can_transition(&self, event: SaveEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SaveEvent) -> Option<SaveState> {
        use SaveEvent::*;
        match (self.state, event) {
            (SaveState::Idle | SaveState::Saved | SaveState::Dirty, Edit) => Some(SaveState::Dirty),
            (SaveState::Error, Edit | Retry) => Some(SaveState::Dirty),
            (SaveState::Dirty, DebounceElapsed) => Some(SaveState::Saving),
            // Edits during a save keep saving; the coordinator re-arms afterwards.
            (SaveState::Saving, Edit) => Some(SaveState::Saving),
            (SaveState::Saving, SaveSucceeded) => Some(SaveState::Saved),
            (SaveState::Saving, SaveFailed) => Some(SaveState::Error),
            (SaveState::Saved, ConfirmationElapsed) => Some(SaveState::Idle),
            (_, Cancel) => Some(SaveState::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SaveEvent) -> AutoSaveResult<SaveState> {
        tracing::debug!(from = ?self.state, event = ?event, "request save transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid save transition requested");
            AutoSaveError::InvalidTransition { from, event }
        })?;

        if self.transition_history.len() == HISTORY_LIMIT {
            self.transition_history.remove(0);
        }
        self.transition_history.push(SaveTransition {
            from: self.state,
            event,
            to: next,
        });
        self.state = next;

        Ok(self.state)
    }

    /// The most recent transitions, oldest first, at most [`HISTORY_LIMIT`].
    pub fn history(&self) -> &[SaveTransition] {
        &self.transition_history
    }
}

impl std::fmt::Display for SaveStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SaveState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_save_cycle_records_ordered_history() {
        let mut machine = SaveStateMachine::new();
        for event in [
            SaveEvent::Edit,
            SaveEvent::Edit,
            SaveEvent::DebounceElapsed,
            SaveEvent::SaveSucceeded,
            SaveEvent::ConfirmationElapsed,
        ] {
            machine.transition(event).expect("valid save cycle");
        }

        assert_eq!(machine.state(), SaveState::Idle);
        let path: Vec<_> = machine.history().iter().map(|step| step.to).collect();
        assert_eq!(
            path,
            vec![
                SaveState::Dirty,
                SaveState::Dirty,
                SaveState::Saving,
                SaveState::Saved,
                SaveState::Idle
            ]
        );
        assert_eq!(
            machine.history()[2],
            SaveTransition {
                from: SaveState::Dirty,
                event: SaveEvent::DebounceElapsed,
                to: SaveState::Saving
            }
        );
    }

    #[test]
    fn failure_moves_to_error_and_edit_or_retry_rearms() {
        let mut machine = SaveStateMachine::new();
        machine.transition(SaveEvent::Edit).unwrap();
        machine.transition(SaveEvent::DebounceElapsed).unwrap();
        machine.transition(SaveEvent::SaveFailed).unwrap();
        assert_eq!(machine.state(), SaveState::Error);
        assert!(machine.can_transition(SaveEvent::Retry));
        assert!(machine.can_transition(SaveEvent::Edit));
        assert!(!machine.can_transition(SaveEvent::DebounceElapsed));
        assert_eq!(machine.transition(SaveEvent::Retry).unwrap(), SaveState::Dirty);
    }

    #[test]
    fn history_keeps_only_recent_transitions() {
        let mut machine = SaveStateMachine::new();
        machine.transition(SaveEvent::Edit).unwrap();
        machine.transition(SaveEvent::DebounceElapsed).unwrap();
        for _ in 0..HISTORY_LIMIT {
            machine.transition(SaveEvent::Edit).unwrap();
        }

        assert_eq!(machine.history().len(), HISTORY_LIMIT);
        assert!(machine
            .history()
            .iter()
            .all(|step| step.event == SaveEvent::Edit && step.from == SaveState::Saving));
        assert_eq!(machine.state(), SaveState::Saving);
    }

    #[test]
    fn cancel_is_accepted_from_every_state() {
        let mut machine = SaveStateMachine::new();
        machine.transition(SaveEvent::Edit).unwrap();
        machine.transition(SaveEvent::DebounceElapsed).unwrap();
        assert_eq!(machine.transition(SaveEvent::Cancel).unwrap(), SaveState::Idle);
        assert_eq!(machine.transition(SaveEvent::Cancel).unwrap(), SaveState::Idle);
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = SaveStateMachine::new();

        let err = machine
            .transition(SaveEvent::SaveSucceeded)
            .expect_err("idle -> save succeeded should fail");
        assert!(matches!(
            err,
            AutoSaveError::InvalidTransition {
                from: SaveState::Idle,
                event: SaveEvent::SaveSucceeded
            }
        ));
        assert_eq!(machine.state(), SaveState::Idle);
        assert!(machine.history().is_empty());
    }
}
