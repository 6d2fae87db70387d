use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

use crate::theme::ThemeRecord;

const RECORD_EXTENSION: &str = "json";
const ID_PREFIX: &str = "theme-";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("persistence service unavailable: {0}")]
    Network(String),
    #[error("theme record rejected: {0}")]
    Validation(String),
    #[error("no theme record with id {0}")]
    NotFound(String),
    #[error("failed to read theme record: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write theme record: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse theme record")]
    Parse(#[from] serde_json::Error),
}

pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

/// Identifier assigned by a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedRecord {
    pub id: String,
}

/// Opaque record store for theme snapshots, one record per project.
#[async_trait]
pub trait ThemePersistence: Send + Sync {
    async fn fetch_theme_record(&self, project_id: &str) -> PersistenceResult<Option<ThemeRecord>>;
    async fn insert_theme_record(&self, record: &ThemeRecord) -> PersistenceResult<InsertedRecord>;
    async fn update_theme_record(&self, id: &str, record: &ThemeRecord) -> PersistenceResult<()>;
}

/// A call observed by [`InMemoryThemeStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceCall {
    Fetch { project_id: String },
    Insert { record: ThemeRecord },
    Update { id: String, record: ThemeRecord },
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, ThemeRecord>,
    calls: Vec<PersistenceCall>,
    next_id: u64,
    failing_writes: usize,
    failure_message: String,
}

/// Process-local store. Records every call and can be told to fail writes.
#[derive(Debug, Default)]
pub struct InMemoryThemeStore {
    state: Mutex<MemoryState>,
}

impl InMemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, record: ThemeRecord) -> Self {
        self.lock()
            .records
            .insert(record.project_id.clone(), record);
        self
    }

    /// The next `count` inserts or updates fail with a network error.
    pub fn fail_next_writes(&self, count: usize, message: impl Into<String>) {
        let mut state = self.lock();
        state.failing_writes = count;
        state.failure_message = message.into();
    }

    pub fn calls(&self) -> Vec<PersistenceCall> {
        self.lock().calls.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| !matches!(call, PersistenceCall::Fetch { .. }))
            .count()
    }

    pub fn record(&self, project_id: &str) -> Option<ThemeRecord> {
        self.lock().records.get(project_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryState {
    fn take_failure(&mut self) -> PersistenceResult<()> {
        if self.failing_writes == 0 {
            return Ok(());
        }
        self.failing_writes -= 1;
        Err(PersistenceError::Network(self.failure_message.clone()))
    }
}

#[async_trait]
impl ThemePersistence for InMemoryThemeStore {
    async fn fetch_theme_record(&self, project_id: &str) -> PersistenceResult<Option<ThemeRecord>> {
        let mut state = self.lock();
        state.calls.push(PersistenceCall::Fetch {
            project_id: project_id.to_string(),
        });
        Ok(state.records.get(project_id).cloned())
    }

    async fn insert_theme_record(&self, record: &ThemeRecord) -> PersistenceResult<InsertedRecord> {
        let mut state = self.lock();
        state.calls.push(PersistenceCall::Insert {
            record: record.clone(),
        });
        state.take_failure()?;
        validate_project_id(&record.project_id)?;

        state.next_id += 1;
        let id = format!("{ID_PREFIX}{}", state.next_id);
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        state.records.insert(stored.project_id.clone(), stored);
        Ok(InsertedRecord { id })
    }

    async fn update_theme_record(&self, id: &str, record: &ThemeRecord) -> PersistenceResult<()> {
        let mut state = self.lock();
        state.calls.push(PersistenceCall::Update {
            id: id.to_string(),
            record: record.clone(),
        });
        state.take_failure()?;

        let project_id = state
            .records
            .iter()
            .find(|(_, stored)| stored.id.as_deref() == Some(id))
            .map(|(project_id, _)| project_id.clone())
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;
        let mut stored = record.clone();
        stored.id = Some(id.to_string());
        state.records.insert(project_id, stored);
        Ok(())
    }
}

/// One pretty-printed `<project_id>.json` per project under a root directory.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    root: PathBuf,
}

impl FileThemeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, project_id: &str) -> PersistenceResult<PathBuf> {
        validate_project_id(project_id)?;
        let mut path = self.root.clone();
        path.push(format!("{project_id}.{RECORD_EXTENSION}"));
        Ok(path)
    }

    fn read(&self, project_id: &str) -> PersistenceResult<Option<ThemeRecord>> {
        let path = self.record_path(project_id)?;
        let serialized = match fs::read_to_string(&path) {
            Ok(serialized) => serialized,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };
        Ok(Some(serde_json::from_str(&serialized)?))
    }

    fn write(&self, record: &ThemeRecord) -> PersistenceResult<()> {
        let path = self.record_path(&record.project_id)?;
        fs::create_dir_all(&self.root).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })?;
        let serialized = serde_json::to_string_pretty(record)?;
        fs::write(&path, serialized).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote theme record");
        Ok(())
    }
}

#[async_trait]
impl ThemePersistence for FileThemeStore {
    async fn fetch_theme_record(&self, project_id: &str) -> PersistenceResult<Option<ThemeRecord>> {
        self.read(project_id)
    }

    async fn insert_theme_record(&self, record: &ThemeRecord) -> PersistenceResult<InsertedRecord> {
        let id = generate_record_id();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.write(&stored)?;
        Ok(InsertedRecord { id })
    }

    async fn update_theme_record(&self, id: &str, record: &ThemeRecord) -> PersistenceResult<()> {
        let existing = self.read(&record.project_id)?;
        if existing.and_then(|stored| stored.id).as_deref() != Some(id) {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        let mut stored = record.clone();
        stored.id = Some(id.to_string());
        self.write(&stored)
    }
}

fn validate_project_id(project_id: &str) -> PersistenceResult<()> {
    if project_id.trim().is_empty() {
        return Err(PersistenceError::Validation("project id is empty".into()));
    }
    if project_id.contains(['/', '\\']) || project_id.starts_with('.') {
        return Err(PersistenceError::Validation(format!(
            "project id {project_id:?} is not a plain name"
        )));
    }
    Ok(())
}

fn generate_record_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!("{ID_PREFIX}{nanos}")
}
