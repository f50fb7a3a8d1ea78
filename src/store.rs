//! Persistence gateway for works.
//!
//! [`WorkStore`] is the only thing the desk needs from storage: load one
//! work, save one work, list works. Each call is atomic for the record it
//! touches, so a work's state and progress are always written together.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::lifecycle::{Priority, WorkItem, WorkState};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Query over stored works. The default skips inactive works.
#[derive(Debug, Clone, Default)]
pub struct WorkFilter {
    pub include_inactive: bool,
    pub state: Option<WorkState>,
    pub translator: Option<String>,
    pub priority: Option<Priority>,
}

impl WorkFilter {
    pub fn matches(&self, work: &WorkItem) -> bool {
        (self.include_inactive || work.active)
            && self.state.is_none_or(|s| work.state() == s)
            && self
                .translator
                .as_deref()
                .is_none_or(|t| work.translator.as_deref() == Some(t))
            && self.priority.is_none_or(|p| work.priority == p)
    }

    fn apply(&self, works: impl IntoIterator<Item = WorkItem>) -> Vec<WorkItem> {
        let mut found: Vec<WorkItem> = works.into_iter().filter(|w| self.matches(w)).collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }
}

pub trait WorkStore {
    /// Fetch a work by id, active or not.
    fn load(&self, id: &str) -> Result<WorkItem, StoreError>;

    /// Overwrite an existing work.
    fn save(&mut self, work: &WorkItem) -> Result<(), StoreError>;

    /// Add a work that does not exist yet.
    fn insert(&mut self, work: &WorkItem) -> Result<(), StoreError>;

    fn list(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>, StoreError>;
}

/// Works kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    works: HashMap<String, WorkItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkStore for MemoryStore {
    fn load(&self, id: &str) -> Result<WorkItem, StoreError> {
        self.works
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(&mut self, work: &WorkItem) -> Result<(), StoreError> {
        match self.works.get_mut(&work.id) {
            Some(slot) => {
                *slot = work.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(work.id.clone())),
        }
    }

    fn insert(&mut self, work: &WorkItem) -> Result<(), StoreError> {
        if self.works.contains_key(&work.id) {
            return Err(StoreError::Duplicate(work.id.clone()));
        }
        self.works.insert(work.id.clone(), work.clone());
        Ok(())
    }

    fn list(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>, StoreError> {
        Ok(filter.apply(self.works.values().cloned()))
    }
}

/// Works kept as a JSON array in a single file.
///
/// Every write replaces the file through a sibling temp file and a rename,
/// so readers see either the old or the new collection, never a torn one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<WorkItem>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, works: &[WorkItem]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(works)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = works.len(), "work file written");
        Ok(())
    }
}

impl WorkStore for JsonFileStore {
    fn load(&self, id: &str) -> Result<WorkItem, StoreError> {
        self.read_all()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(&mut self, work: &WorkItem) -> Result<(), StoreError> {
        let mut works = self.read_all()?;
        let slot = works
            .iter_mut()
            .find(|w| w.id == work.id)
            .ok_or_else(|| StoreError::NotFound(work.id.clone()))?;
        *slot = work.clone();
        self.write_all(&works)
    }

    fn insert(&mut self, work: &WorkItem) -> Result<(), StoreError> {
        let mut works = self.read_all()?;
        if works.iter().any(|w| w.id == work.id) {
            return Err(StoreError::Duplicate(work.id.clone()));
        }
        works.push(work.clone());
        self.write_all(&works)
    }

    fn list(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>, StoreError> {
        Ok(filter.apply(self.read_all()?))
    }
}
