use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{StateRegistry, WorkState};

pub const DEFAULT_SOURCE_LANGUAGE: &str = "Classical Chinese";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Vietnamese";

/// Scheduling priority of a work. Independent of the lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    // Older records store the numeric codes.
    #[default]
    #[serde(alias = "0")]
    Normal,
    #[serde(alias = "1")]
    High,
    #[serde(alias = "2")]
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" | "0" => Ok(Priority::Normal),
            "high" | "1" => Ok(Priority::High),
            "urgent" | "2" => Ok(Priority::Urgent),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

/// Caller-supplied fields for a new work.
#[derive(Debug, Clone, Default)]
pub struct NewWork {
    pub name: String,
    pub name_original: String,
    pub author: String,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub page_count: u32,
    pub word_count: u32,
    pub description: String,
    pub priority: Priority,
    pub translator: Option<String>,
}

/// A literary work moving through the translation pipeline.
///
/// `state` and `progress_percent` are private: they only change through
/// [`LifecycleEngine`](super::LifecycleEngine), which writes both together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredWorkItem")]
pub struct WorkItem {
    pub id: String,
    pub name: String,
    pub name_original: String,
    pub author: String,
    pub source_language: String,
    pub target_language: String,
    pub page_count: u32,
    pub word_count: u32,
    pub description: String,
    pub notes: String,
    pub translator: Option<String>,
    pub priority: Priority,
    pub active: bool,
    pub created_by: Option<String>,
    state: WorkState,
    progress_percent: u8,
    #[serde(rename = "translation_progress", skip_serializing_if = "Option::is_none")]
    manual_progress: Option<u8>,
    state_history: Vec<WorkState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self::create(
            NewWork {
                name: name.into(),
                ..Default::default()
            },
            None,
        )
    }

    /// Builds a draft work from caller input.
    pub fn create(new: NewWork, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            name_original: new.name_original,
            author: new.author,
            source_language: new
                .source_language
                .unwrap_or_else(|| DEFAULT_SOURCE_LANGUAGE.to_string()),
            target_language: new
                .target_language
                .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
            page_count: new.page_count,
            word_count: new.word_count,
            description: new.description,
            notes: String::new(),
            translator: new.translator.filter(|t| !t.trim().is_empty()),
            priority: new.priority,
            active: true,
            created_by,
            state: WorkState::Draft,
            progress_percent: StateRegistry::progress_for(WorkState::Draft),
            manual_progress: None,
            state_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> WorkState {
        self.state
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// States this work has left, oldest first.
    pub fn state_history(&self) -> &[WorkState] {
        &self.state_history
    }

    /// True when a non-blank translator id is set.
    pub fn has_translator(&self) -> bool {
        self.translator
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Manually entered progress from older records. Never used for display.
    pub fn legacy_progress(&self) -> Option<u8> {
        self.manual_progress
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    /// Soft delete. The record stays in storage but drops out of default queries.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Only the lifecycle engine moves a work between states.
    pub(super) fn enter_state(&mut self, to: WorkState) {
        self.state_history.push(self.state);
        self.state = to;
        self.progress_percent = StateRegistry::progress_for(to);
        self.touch();
    }
}

/// On-disk shape of a work. Older rows may lack newer columns or carry a
/// hand-entered `translation_progress`; progress is always re-derived from
/// the state on read.
#[derive(Debug, Deserialize)]
struct StoredWorkItem {
    id: String,
    name: String,
    #[serde(default)]
    name_original: String,
    #[serde(default)]
    author: String,
    #[serde(default = "default_source_language")]
    source_language: String,
    #[serde(default = "default_target_language")]
    target_language: String,
    #[serde(default)]
    page_count: u32,
    #[serde(default)]
    word_count: u32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    translator: Option<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default = "default_state")]
    state: WorkState,
    // Unvalidated integer column in older rows; clamped on read.
    #[serde(default)]
    translation_progress: Option<i64>,
    #[serde(default)]
    state_history: Vec<WorkState>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn default_source_language() -> String {
    DEFAULT_SOURCE_LANGUAGE.to_string()
}

fn default_target_language() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_active() -> bool {
    true
}

fn default_state() -> WorkState {
    WorkState::Draft
}

impl From<StoredWorkItem> for WorkItem {
    fn from(stored: StoredWorkItem) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            name_original: stored.name_original,
            author: stored.author,
            source_language: stored.source_language,
            target_language: stored.target_language,
            page_count: stored.page_count,
            word_count: stored.word_count,
            description: stored.description,
            notes: stored.notes,
            translator: stored.translator,
            priority: stored.priority,
            active: stored.active,
            created_by: stored.created_by,
            state: stored.state,
            progress_percent: StateRegistry::progress_for(stored.state),
            manual_progress: stored
                .translation_progress
                .and_then(|p| u8::try_from(p.clamp(0, 100)).ok()),
            state_history: stored.state_history,
            created_at: stored.created_at,
            updated_at: stored.updated_at.unwrap_or(stored.created_at),
        }
    }
}
