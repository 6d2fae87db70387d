use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::autosave::AutoSaveSettings;
use crate::fonts::{MIN_SEARCH_CHARS, SEARCH_DISPLAY_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "sitestyles";
const APP_CONFIG_FILE: &str = "config.json";

/// Editor settings from `config.json`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub autosave_debounce_ms: u64,
    pub saved_confirmation_ms: u64,
    pub font_batch_size: usize,
    pub font_batch_delay_ms: u64,
    pub font_search_min_chars: usize,
    pub font_search_limit: usize,
    /// Directory for the JSON-file theme store.
    pub storage_dir: Option<PathBuf>,
    /// External font catalog replacing the bundled one.
    pub font_catalog_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_debounce_ms: 2000,
            saved_confirmation_ms: 3000,
            font_batch_size: 6,
            font_batch_delay_ms: 150,
            font_search_min_chars: MIN_SEARCH_CHARS,
            font_search_limit: SEARCH_DISPLAY_LIMIT,
            storage_dir: None,
            font_catalog_path: None,
        }
    }
}

impl EditorConfig {
    pub fn autosave_settings(&self) -> AutoSaveSettings {
        AutoSaveSettings {
            debounce: Duration::from_millis(self.autosave_debounce_ms),
            saved_confirmation: Duration::from_millis(self.saved_confirmation_ms),
        }
    }

    pub fn font_batch_delay(&self) -> Duration {
        Duration::from_millis(self.font_batch_delay_ms)
    }
}

pub fn load_editor_config() -> EditorConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_editor_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_editor_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EditorConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EditorConfig::default(),
    };
    load_editor_config_from(&path)
}

/// Reads a config file, falling back to defaults when it is missing or bad.
pub fn load_editor_config_from(path: &Path) -> EditorConfig {
    if !path.exists() {
        return EditorConfig::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EditorConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EditorConfig::default()
        }
    }
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("sitestyles-config-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    fn write_config(root: &Path, contents: &str) {
        let path = app_config_path(APP_DIR, APP_CONFIG_FILE, Some(root), None).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "sitestyles",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/sitestyles/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("sitestyles", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/sitestyles/config.json"));
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("sitestyles", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn missing_config_uses_defaults() {
        with_temp_root(|root| {
            let config = load_editor_config_with(Some(root), None);
            assert_eq!(config, EditorConfig::default());
            assert_eq!(config.autosave_settings(), AutoSaveSettings::default());
        });
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        with_temp_root(|root| {
            write_config(
                root,
                r#"{ "autosave_debounce_ms": 500, "storage_dir": "/var/lib/sitestyles" }"#,
            );
            let config = load_editor_config_with(Some(root), None);
            assert_eq!(config.autosave_debounce_ms, 500);
            assert_eq!(config.saved_confirmation_ms, 3000);
            assert_eq!(config.font_batch_size, 6);
            assert_eq!(
                config.storage_dir.as_deref(),
                Some(Path::new("/var/lib/sitestyles"))
            );
            assert_eq!(config.autosave_settings().debounce, Duration::from_millis(500));
        });
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        with_temp_root(|root| {
            write_config(root, "{ not json");
            assert_eq!(
                load_editor_config_with(Some(root), None),
                EditorConfig::default()
            );
        });
    }
}
