//! Translator roster.
//!
//! Translators are kept apart from system accounts. Assigning a work checks
//! the id against the roster when one is configured.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translator {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub workplace: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Translator {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: None,
            phone: None,
            workplace: None,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Known translators, keyed by id, backed by an optional JSON file.
#[derive(Debug, Default)]
pub struct TranslatorRoster {
    translators: HashMap<String, Translator>,
    path: Option<PathBuf>,
}

impl TranslatorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the roster from `path`. A missing or empty file is an empty roster.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut roster = Self {
            translators: HashMap::new(),
            path: None,
        };
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if !contents.trim().is_empty() {
                let list: Vec<Translator> = serde_json::from_str(&contents)?;
                roster.translators = list.into_iter().map(|t| (t.id.clone(), t)).collect();
            }
        }
        roster.path = Some(path);
        Ok(roster)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Translator> {
        self.translators.get(id)
    }

    /// Only active translators can take new work.
    pub fn is_assignable(&self, id: &str) -> bool {
        self.get(id).is_some_and(|t| t.active)
    }

    /// All translators, newest first.
    pub fn list(&self) -> Vec<&Translator> {
        let mut all: Vec<&Translator> = self.translators.values().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        all
    }

    /// Add a translator and write the roster back if it is file-backed.
    pub fn register(&mut self, translator: Translator) -> Result<(), StoreError> {
        if self.translators.contains_key(&translator.id) {
            return Err(StoreError::Duplicate(translator.id));
        }
        self.translators.insert(translator.id.clone(), translator);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let list = self.list();
        let json = serde_json::to_string_pretty(&list)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), count = list.len(), "translator roster written");
        Ok(())
    }
}
