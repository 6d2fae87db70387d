//! Live preview: pushes the CSS variable set for the current token snapshot
//! into the document-level style scope.

use std::sync::Arc;

use crate::fonts::FontCatalog;
use crate::style::{compute_variables, default_variables, AppliedTheme};
use crate::theme::TokenStore;

/// The single global surface CSS variables are written to.
///
/// Writes always carry the full variable set and replace everything the
/// scope held before.
pub trait StyleScope {
    fn replace_all(&mut self, theme: &AppliedTheme);
    fn current(&self) -> &AppliedTheme;
}

/// In-process stand-in for the document root's inline style.
#[derive(Debug, Clone, Default)]
pub struct DocumentStyleScope {
    applied: AppliedTheme,
    writes: u64,
}

impl DocumentStyleScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn to_css(&self) -> String {
        self.applied.to_css_block()
    }
}

impl StyleScope for DocumentStyleScope {
    fn replace_all(&mut self, theme: &AppliedTheme) {
        self.applied = theme.clone();
        self.writes += 1;
    }

    fn current(&self) -> &AppliedTheme {
        &self.applied
    }
}

pub struct LivePreview<S: StyleScope = DocumentStyleScope> {
    scope: S,
    catalog: Arc<FontCatalog>,
    defaults: AppliedTheme,
}

impl<S: StyleScope> LivePreview<S> {
    pub fn new(scope: S, catalog: Arc<FontCatalog>) -> Self {
        let defaults = default_variables(&catalog);
        Self {
            scope,
            catalog,
            defaults,
        }
    }

    /// Recomputes every variable from `store` and writes the set. Skips the
    /// write when the scope already shows exactly this set.
    pub fn apply(&mut self, store: &TokenStore) -> &AppliedTheme {
        let theme = compute_variables(store, &self.catalog);
        if self.scope.current() == &theme {
            tracing::trace!(project_id = %store.project_id(), "preview already current");
        } else {
            self.scope.replace_all(&theme);
        }
        self.scope.current()
    }

    /// Puts the documented defaults back; used before a new project loads.
    pub fn reset_to_defaults(&mut self) {
        tracing::debug!("resetting preview variables to defaults");
        self.scope.replace_all(&self.defaults);
    }

    pub fn defaults(&self) -> &AppliedTheme {
        &self.defaults
    }

    pub fn current(&self) -> &AppliedTheme {
        self.scope.current()
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }
}
