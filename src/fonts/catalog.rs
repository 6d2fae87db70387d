use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_CATALOG: &str = include_str!("catalog.json");

/// Queries shorter than this return nothing instead of the whole catalog.
pub const MIN_SEARCH_CHARS: usize = 2;
/// Number of matches the font picker shows at once.
pub const SEARCH_DISPLAY_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum FontCatalogError {
    #[error("failed to read font catalog: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse font catalog")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontCategory {
    #[serde(rename = "sans-serif")]
    SansSerif,
    #[serde(rename = "serif")]
    Serif,
    #[serde(rename = "display")]
    Display,
    #[serde(rename = "handwriting")]
    Handwriting,
    #[serde(rename = "monospace")]
    Monospace,
}

impl FontCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Display => "display",
            Self::Handwriting => "handwriting",
            Self::Monospace => "monospace",
        }
    }

    /// CSS generic family appended after the named font.
    pub const fn generic_family(self) -> &'static str {
        match self {
            Self::SansSerif | Self::Display => "sans-serif",
            Self::Serif => "serif",
            Self::Handwriting => "cursive",
            Self::Monospace => "monospace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sans-serif" | "sans" => Some(Self::SansSerif),
            "serif" => Some(Self::Serif),
            "display" => Some(Self::Display),
            "handwriting" => Some(Self::Handwriting),
            "monospace" | "mono" => Some(Self::Monospace),
            _ => None,
        }
    }
}

impl fmt::Display for FontCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    pub name: String,
    pub category: FontCategory,
    pub weights: Vec<u16>,
    #[serde(default)]
    pub popular: bool,
}

/// Read-only lookup table of selectable web fonts.
#[derive(Debug, Clone)]
pub struct FontCatalog {
    entries: Vec<FontEntry>,
    by_name: HashMap<String, usize>,
    min_query_chars: usize,
}

impl FontCatalog {
    pub fn from_entries(entries: Vec<FontEntry>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            // First entry wins on a case-insensitive name collision.
            by_name.entry(entry.name.to_lowercase()).or_insert(index);
        }
        Self {
            entries,
            by_name,
            min_query_chars: MIN_SEARCH_CHARS,
        }
    }

    pub fn from_json(serialized: &str) -> Result<Self, FontCatalogError> {
        let entries: Vec<FontEntry> = serde_json::from_str(serialized)?;
        Ok(Self::from_entries(entries))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, FontCatalogError> {
        let serialized = fs::read_to_string(path).map_err(|source| FontCatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&serialized)
    }

    /// Catalog compiled into the binary.
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_CATALOG).unwrap_or_else(|err| {
            tracing::warn!(%err, "bundled font catalog is unreadable; starting empty");
            Self::from_entries(Vec::new())
        })
    }

    pub fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&FontEntry> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .and_then(|index| self.entries.get(*index))
    }

    /// Case-insensitive substring match in catalog order.
    pub fn search(&self, query: &str) -> Vec<&FontEntry> {
        let query = query.trim();
        if query.chars().count() < self.min_query_chars.max(1) {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn search_limited(&self, query: &str, limit: usize) -> Vec<&FontEntry> {
        let mut matches = self.search(query);
        matches.truncate(limit);
        matches
    }

    pub fn by_category(&self, category: FontCategory) -> Vec<&FontEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    pub fn popular_only(&self) -> Vec<&FontEntry> {
        self.entries.iter().filter(|entry| entry.popular).collect()
    }

    /// `font-family` declaration for a font name, falling back to
    /// `fallback_generic` when the font is not in the catalog.
    pub fn family_declaration(&self, name: &str, fallback_generic: &str) -> String {
        let name = name.trim();
        match self.get(name) {
            Some(entry) => format!(
                "{}, {}",
                quote_family(&entry.name),
                entry.category.generic_family()
            ),
            None if name.is_empty() => fallback_generic.to_string(),
            None => format!("{}, {}", quote_family(name), fallback_generic),
        }
    }
}

/// Single-quoted CSS string for a family name. Quotes and backslashes are
/// escaped; line breaks become the `\A` escape since CSS strings cannot span
/// lines.
pub fn quote_family(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('\'');
    for ch in name.chars() {
        match ch {
            '\'' | '\\' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\n' | '\r' => quoted.push_str("\\A "),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}
