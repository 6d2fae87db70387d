use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use serde::Serialize;

use super::resolver::font_name_for;
use crate::fonts::{quote_family, FontCatalog};
use crate::theme::{
    button_defaults, text_role_default, ButtonProperty, ButtonVariant, FontSource, TextRole,
    TokenKey, TokenStore,
};

/// Complete CSS custom-property set for one theme snapshot.
///
/// Always holds every variable, so applying it replaces whatever was there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AppliedTheme {
    variables: BTreeMap<String, String>,
}

impl AppliedTheme {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// `:root { ... }` block ready to inject into a stylesheet.
    pub fn to_css_block(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.variables {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }

    fn insert(&mut self, name: String, value: String) {
        self.variables.insert(name, value);
    }
}

/// Every token variable plus derived font-family and radius values, with
/// unset tokens filled from defaults.
pub fn compute_variables(store: &TokenStore, catalog: &FontCatalog) -> AppliedTheme {
    let mut theme = AppliedTheme::default();

    for key in TokenKey::all() {
        let value = store.resolve(key);
        if value.is_unset() {
            continue;
        }
        let css = match (key, value.as_text()) {
            // Font names are free text; they go out as CSS strings.
            (TokenKey::PrimaryFont | TokenKey::SecondaryFont, Some(name)) => quote_family(name),
            _ => value.to_css(),
        };
        theme.insert(key.css_variable(), css);
    }

    for source in FontSource::ALL {
        let family = catalog.family_declaration(
            font_name_for(store, *source),
            source.generic_fallback(),
        );
        theme.insert(format!("--{source}-font-family"), family);
    }

    for role in TextRole::ALL {
        let source = store
            .typography()
            .role(*role)
            .font_source
            .unwrap_or(text_role_default(*role).font_source);
        theme.insert(
            format!("--{role}-font-family"),
            format!("var(--{source}-font-family)"),
        );
    }

    for variant in ButtonVariant::ALL {
        let Some(boxed) = store.buttons().variant(*variant).boxed() else {
            continue;
        };
        if let Some(radius) = boxed.radius.or(button_defaults(*variant).radius) {
            let name = TokenKey::Button(*variant, ButtonProperty::Radius).css_variable();
            theme.insert(format!("{name}-value"), radius.css_value().to_string());
        }
    }

    theme
}

/// Variables for an empty store; what the document shows between projects.
pub fn default_variables(catalog: &FontCatalog) -> AppliedTheme {
    compute_variables(&TokenStore::default(), catalog)
}

/// Defaults computed against the bundled catalog, built once.
pub fn bundled_default_variables() -> &'static AppliedTheme {
    static DEFAULTS: OnceLock<AppliedTheme> = OnceLock::new();
    DEFAULTS.get_or_init(|| default_variables(&FontCatalog::bundled()))
}
