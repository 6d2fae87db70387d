use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};
use super::error::AutoSaveResult;
use super::machine::{SaveEvent, SaveState, SaveStateMachine, SaveTransition};
use crate::theme::{ThemeRecord, TokenStore};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);
pub const DEFAULT_SAVED_CONFIRMATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveSettings {
    pub debounce: Duration,
    /// How long the "saved" confirmation stays up before returning to idle.
    pub saved_confirmation: Duration,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            saved_confirmation: DEFAULT_SAVED_CONFIRMATION,
        }
    }
}

/// Insert until the record has an id, update afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    Insert,
    Update { id: String },
}

/// Identifies one issued save. Results carrying a stale ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    generation: u64,
    sequence: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub mode: SaveMode,
    /// Whole-store snapshot, never a diff.
    pub record: ThemeRecord,
}

/// Debounces token mutations into single whole-snapshot saves.
///
/// The coordinator never touches storage itself: callers take a
/// [`SaveRequest`] from [`begin_save`](Self::begin_save), run it, and report
/// back with [`complete`](Self::complete) or [`fail`](Self::fail).
#[derive(Debug)]
pub struct AutoSaveCoordinator<C: Clock = SystemClock> {
    clock: C,
    settings: AutoSaveSettings,
    machine: SaveStateMachine,
    deadline: Option<Instant>,
    saved_until: Option<Instant>,
    generation: u64,
    next_sequence: u64,
    in_flight: Option<SaveTicket>,
    edited_during_save: bool,
    last_error: Option<String>,
}

impl AutoSaveCoordinator<SystemClock> {
    pub fn new(settings: AutoSaveSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> AutoSaveCoordinator<C> {
    pub fn with_clock(settings: AutoSaveSettings, clock: C) -> Self {
        Self {
            clock,
            settings,
            machine: SaveStateMachine::new(),
            deadline: None,
            saved_until: None,
            generation: 0,
            next_sequence: 0,
            in_flight: None,
            edited_during_save: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> SaveState {
        self.machine.state()
    }

    pub fn settings(&self) -> AutoSaveSettings {
        self.settings
    }

    pub fn history(&self) -> &[SaveTransition] {
        self.machine.history()
    }

    /// When the pending save becomes due, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while the store holds changes that have not reached storage.
    pub fn has_unsaved_changes(&self) -> bool {
        matches!(
            self.state(),
            SaveState::Dirty | SaveState::Saving | SaveState::Error
        )
    }

    /// Records a token mutation and restarts the debounce window.
    pub fn notify_mutation(&mut self) -> AutoSaveResult<SaveState> {
        let state = self.machine.transition(SaveEvent::Edit)?;
        self.deadline = Some(self.clock.now() + self.settings.debounce);
        self.saved_until = None;
        self.last_error = None;
        if state == SaveState::Saving {
            self.edited_during_save = true;
        }
        Ok(state)
    }

    pub fn is_due(&self) -> bool {
        self.state() == SaveState::Dirty
            && self
                .deadline
                .is_some_and(|deadline| self.clock.now() >= deadline)
    }

    /// Starts the save if the debounce window has elapsed.
    pub fn begin_save(&mut self, store: &TokenStore) -> AutoSaveResult<Option<SaveRequest>> {
        if !self.is_due() {
            return Ok(None);
        }
        self.machine.transition(SaveEvent::DebounceElapsed)?;
        self.deadline = None;
        self.edited_during_save = false;

        let ticket = SaveTicket {
            generation: self.generation,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.in_flight = Some(ticket);

        let mode = match store.id() {
            Some(id) => SaveMode::Update { id: id.to_string() },
            None => SaveMode::Insert,
        };
        tracing::info!(project_id = %store.project_id(), ?mode, "saving theme");

        Ok(Some(SaveRequest {
            ticket,
            mode,
            record: store.to_record(),
        }))
    }

    /// Reports a successful save. Returns `false` when the ticket is stale
    /// (the coordinator was cancelled meanwhile) and the result must be
    /// ignored, including any id it assigned.
    pub fn complete(&mut self, ticket: SaveTicket) -> AutoSaveResult<bool> {
        if !self.accepts(ticket) {
            tracing::debug!(?ticket, "discarding stale save result");
            return Ok(false);
        }
        self.in_flight = None;
        self.machine.transition(SaveEvent::SaveSucceeded)?;
        tracing::info!("theme saved");

        if std::mem::take(&mut self.edited_during_save) {
            // The deadline set by the edit during the save still stands.
            self.machine.transition(SaveEvent::Edit)?;
        } else {
            self.saved_until = Some(self.clock.now() + self.settings.saved_confirmation);
        }
        Ok(true)
    }

    /// Reports a failed save. The changes stay unsaved until an edit or
    /// [`retry`](Self::retry) re-arms the timer.
    pub fn fail(&mut self, ticket: SaveTicket, message: impl Into<String>) -> AutoSaveResult<bool> {
        if !self.accepts(ticket) {
            tracing::debug!(?ticket, "discarding stale save failure");
            return Ok(false);
        }
        let message = message.into();
        self.in_flight = None;
        self.machine.transition(SaveEvent::SaveFailed)?;
        tracing::warn!(error = %message, "theme save failed");
        self.deadline = None;
        self.edited_during_save = false;
        self.last_error = Some(message);
        Ok(true)
    }

    /// Advances time-driven transitions; currently only saved → idle.
    pub fn tick(&mut self) -> AutoSaveResult<SaveState> {
        let confirmation_over = self
            .saved_until
            .is_some_and(|until| self.clock.now() >= until);
        if self.state() == SaveState::Saved && confirmation_over {
            self.saved_until = None;
            self.machine.transition(SaveEvent::ConfirmationElapsed)?;
        }
        Ok(self.state())
    }

    /// Manual retry after a failure.
    pub fn retry(&mut self) -> AutoSaveResult<SaveState> {
        let state = self.machine.transition(SaveEvent::Retry)?;
        self.deadline = Some(self.clock.now() + self.settings.debounce);
        Ok(state)
    }

    /// Hides the failure message; the changes remain unsaved.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Stops all timers and invalidates any in-flight save. Pending changes
    /// are dropped: there is no navigation guard.
    pub fn cancel(&mut self) -> AutoSaveResult<()> {
        if self.has_unsaved_changes() {
            tracing::warn!(state = ?self.state(), "cancelling autosave with unsaved theme changes");
        }
        self.machine.transition(SaveEvent::Cancel)?;
        self.generation += 1;
        self.deadline = None;
        self.saved_until = None;
        self.in_flight = None;
        self.edited_during_save = false;
        self.last_error = None;
        Ok(())
    }

    fn accepts(&self, ticket: SaveTicket) -> bool {
        ticket.generation == self.generation && self.in_flight == Some(ticket)
    }
}
