pub mod autosave;
pub mod billing;
pub mod config;
pub mod editor;
pub mod error;
pub mod fonts;
pub mod logging;
pub mod preview;
pub mod storage;
pub mod style;
pub mod theme;
pub use error::{AppError, AppResult};

use std::sync::Arc;

use autosave::AutoSaveCoordinator;
use config::EditorConfig;
use editor::EditorSession;
use fonts::{FontAssetService, FontCatalog, FontLoader};
use preview::StyleScope;
use storage::{FileThemeStore, InMemoryThemeStore, ThemePersistence};

/// Font catalog selected by the configuration: the external table when one
/// is configured, the bundled one otherwise.
pub fn load_font_catalog(config: &EditorConfig) -> AppResult<FontCatalog> {
    let catalog = match &config.font_catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading external font catalog");
            FontCatalog::load_from_path(path)?
        }
        None => FontCatalog::bundled(),
    };
    Ok(catalog.with_min_query_chars(config.font_search_min_chars))
}

pub fn font_loader(
    config: &EditorConfig,
    service: Arc<dyn FontAssetService>,
    catalog: Arc<FontCatalog>,
) -> FontLoader {
    FontLoader::new(service, catalog)
        .with_batching(config.font_batch_size, config.font_batch_delay())
}

/// Editing session wired from configuration. Themes go to `storage_dir`
/// when one is configured and stay in memory otherwise.
pub fn editor_session<S: StyleScope>(
    config: &EditorConfig,
    catalog: Arc<FontCatalog>,
    scope: S,
    fonts: Option<Arc<dyn FontAssetService>>,
) -> EditorSession<S> {
    let persistence: Arc<dyn ThemePersistence> = match &config.storage_dir {
        Some(dir) => {
            tracing::info!(path = %dir.display(), "using file theme store");
            Arc::new(FileThemeStore::new(dir))
        }
        None => {
            tracing::debug!("no storage_dir configured; themes are kept in memory");
            Arc::new(InMemoryThemeStore::new())
        }
    };
    let autosave = AutoSaveCoordinator::new(config.autosave_settings());
    let session = EditorSession::new(persistence, Arc::clone(&catalog), scope, autosave);
    match fonts {
        Some(service) => session.with_font_loader(font_loader(config, service, catalog)),
        None => session,
    }
}
