use serde::{Deserialize, Serialize};

use super::ThemeResult;

/// Persisted form of a site's theme: identity plus flat token columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    #[serde(flatten)]
    pub tokens: serde_json::Map<String, serde_json::Value>,
}

impl ThemeRecord {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            id: None,
            project_id: project_id.into(),
            tokens: serde_json::Map::new(),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn from_json(serialized: &str) -> ThemeResult<Self> {
        Ok(serde_json::from_str(serialized)?)
    }

    pub fn to_json_pretty(&self) -> ThemeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
