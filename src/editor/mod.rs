//! Editing session for the active project.
//!
//! Every mutation goes to the token store first, then to the live preview
//! synchronously and to the auto-save coordinator. Switching project cancels
//! pending saves and resets the preview before the next record is fetched.

use std::sync::Arc;

use thiserror::Error;

use crate::autosave::{
    AutoSaveCoordinator, AutoSaveError, Clock, SaveMode, SaveRequest, SaveState, SystemClock,
};
use crate::fonts::{FontCatalog, FontLoadState, FontLoader};
use crate::preview::{DocumentStyleScope, LivePreview, StyleScope};
use crate::storage::{PersistenceError, ThemePersistence};
use crate::style::{RenderDescriptor, StyleResolver};
use crate::theme::{ButtonVariant, FontSource, ThemeError, TokenKey, TokenStore, TokenValue};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no project is open")]
    NoActiveProject,
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error("failed to load theme for {project_id}: {source}")]
    Fetch {
        project_id: String,
        source: PersistenceError,
    },
    #[error(transparent)]
    AutoSave(#[from] AutoSaveError),
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;

pub struct EditorSession<S: StyleScope = DocumentStyleScope, C: Clock = SystemClock> {
    persistence: Arc<dyn ThemePersistence>,
    resolver: StyleResolver,
    preview: LivePreview<S>,
    autosave: AutoSaveCoordinator<C>,
    fonts: Option<FontLoader>,
    store: Option<TokenStore>,
}

impl<S: StyleScope, C: Clock> EditorSession<S, C> {
    pub fn new(
        persistence: Arc<dyn ThemePersistence>,
        catalog: Arc<FontCatalog>,
        scope: S,
        autosave: AutoSaveCoordinator<C>,
    ) -> Self {
        Self {
            persistence,
            resolver: StyleResolver::new(Arc::clone(&catalog)),
            preview: LivePreview::new(scope, catalog),
            autosave,
            fonts: None,
            store: None,
        }
    }

    pub fn with_font_loader(mut self, fonts: FontLoader) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn store(&self) -> Option<&TokenStore> {
        self.store.as_ref()
    }

    pub fn preview(&self) -> &LivePreview<S> {
        &self.preview
    }

    pub fn autosave(&self) -> &AutoSaveCoordinator<C> {
        &self.autosave
    }

    pub fn fonts(&self) -> Option<&FontLoader> {
        self.fonts.as_ref()
    }

    pub fn save_state(&self) -> SaveState {
        self.autosave.state()
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.autosave.last_error()
    }

    /// Makes `project_id` the active project.
    ///
    /// The previous project's pending save is cancelled and the preview shows
    /// defaults until the new record has been fetched and applied.
    pub async fn open_project(&mut self, project_id: &str) -> EditorResult<&TokenStore> {
        self.autosave.cancel()?;
        self.store = None;
        self.preview.reset_to_defaults();
        tracing::info!(project_id = %project_id, "opening project theme");

        let record = self
            .persistence
            .fetch_theme_record(project_id)
            .await
            .map_err(|source| EditorError::Fetch {
                project_id: project_id.to_string(),
                source,
            })?;
        let store = match record {
            Some(record) => TokenStore::from_record(&record),
            None => {
                tracing::debug!(project_id = %project_id, "no saved theme; using defaults");
                TokenStore::default_for(project_id)
            }
        };
        self.preview.apply(&store);
        let store = self.store.insert(store);
        Ok(store)
    }

    /// Applies one token mutation.
    pub fn edit(&mut self, key: TokenKey, value: impl Into<TokenValue>) -> EditorResult<SaveState> {
        let store = self.store.as_mut().ok_or(EditorError::NoActiveProject)?;
        store.set(key, value)?;
        self.preview.apply(store);
        Ok(self.autosave.notify_mutation()?)
    }

    /// Sets a site font and loads its full weight range right away.
    pub async fn select_font(
        &mut self,
        source: FontSource,
        name: &str,
    ) -> EditorResult<FontLoadState> {
        let key = match source {
            FontSource::Primary => TokenKey::PrimaryFont,
            FontSource::Secondary => TokenKey::SecondaryFont,
        };
        self.edit(key, name)?;
        match &self.fonts {
            Some(fonts) => Ok(fonts.load_selected(name).await),
            None => Ok(FontLoadState::Unrequested),
        }
    }

    pub fn descriptor(&self, variant: ButtonVariant) -> EditorResult<RenderDescriptor> {
        let store = self.store.as_ref().ok_or(EditorError::NoActiveProject)?;
        Ok(self.resolver.resolve(variant, store))
    }

    /// Drives timers: ends the saved confirmation and runs a save once the
    /// debounce window has passed. Save failures land in the error state,
    /// not in the returned result.
    pub async fn tick(&mut self) -> EditorResult<SaveState> {
        self.autosave.tick()?;
        let Some(store) = self.store.as_ref() else {
            return Ok(self.autosave.state());
        };
        if let Some(request) = self.autosave.begin_save(store)? {
            self.run_save(request).await?;
        }
        Ok(self.autosave.state())
    }

    pub fn retry_save(&mut self) -> EditorResult<SaveState> {
        Ok(self.autosave.retry()?)
    }

    pub fn dismiss_save_error(&mut self) {
        self.autosave.dismiss_error();
    }

    /// Leaves the editor. Unsaved changes are dropped.
    pub fn close(&mut self) -> EditorResult<()> {
        self.autosave.cancel()?;
        self.store = None;
        self.preview.reset_to_defaults();
        Ok(())
    }

    async fn run_save(&mut self, request: SaveRequest) -> EditorResult<()> {
        let persistence = Arc::clone(&self.persistence);
        let SaveRequest {
            ticket,
            mode,
            record,
        } = request;

        match mode {
            SaveMode::Insert => match persistence.insert_theme_record(&record).await {
                Ok(inserted) => {
                    if self.autosave.complete(ticket)? {
                        if let Some(store) = self.store.as_mut() {
                            tracing::debug!(id = %inserted.id, "theme record created");
                            store.assign_id(inserted.id);
                        }
                    }
                }
                Err(err) => {
                    self.autosave.fail(ticket, err.to_string())?;
                }
            },
            SaveMode::Update { id } => match persistence.update_theme_record(&id, &record).await {
                Ok(()) => {
                    self.autosave.complete(ticket)?;
                }
                Err(err) => {
                    self.autosave.fail(ticket, err.to_string())?;
                }
            },
        }
        Ok(())
    }
}
