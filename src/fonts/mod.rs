mod catalog;
mod loader;

pub use catalog::{
    quote_family, FontCatalog, FontCatalogError, FontCategory, FontEntry, MIN_SEARCH_CHARS,
    SEARCH_DISPLAY_LIMIT,
};
pub use loader::{
    FontAssetService, FontFidelity, FontLoadError, FontLoadState, FontLoader, FontRequest,
    DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, PREVIEW_WEIGHTS,
};
