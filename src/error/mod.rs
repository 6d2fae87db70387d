use crate::autosave::AutoSaveError;
use crate::billing::BillingError;
use crate::editor::EditorError;
use crate::fonts::{FontCatalogError, FontLoadError};
use crate::storage::PersistenceError;
use crate::theme::ThemeError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    FontCatalog(#[from] FontCatalogError),
    #[error(transparent)]
    FontLoad(#[from] FontLoadError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    AutoSave(#[from] AutoSaveError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Billing(#[from] BillingError),
}
