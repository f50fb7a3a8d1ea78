//! Project work tasks: meetings, reviews, admin chores.
//!
//! Provides [`WorkTask`], which tracks its own status and a hand-entered
//! progress percentage. Unlike a translation work there is no guarded
//! lifecycle here; the status is set directly and only the progress range
//! and the due-date checks are enforced.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "chua_bat_dau")]
    NotStarted,
    #[serde(alias = "dang_tien_hanh")]
    InProgress,
    #[serde(alias = "hoan_thanh")]
    Completed,
    #[serde(alias = "khong_hoan_thanh")]
    NotCompleted,
    #[serde(alias = "cham_tien_do")]
    BehindSchedule,
    #[serde(alias = "hoan_thanh_truoc_han")]
    CompletedEarly,
    #[serde(alias = "da_huy")]
    Cancelled,
    #[serde(alias = "tam_hoan")]
    Postponed,
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[serde(alias = "thap")]
    Low,
    #[default]
    #[serde(alias = "trung_binh")]
    Medium,
    #[serde(alias = "cao")]
    High,
    #[serde(alias = "rat_cao")]
    VeryHigh,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
            TaskPriority::VeryHigh => write!(f, "very_high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTask {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigned_to: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    progress_percent: u8,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl WorkTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::default(),
            status: TaskStatus::NotStarted,
            assigned_to: None,
            start_date: None,
            due_date: None,
            completed_date: None,
            progress_percent: 0,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn set_progress(&mut self, percent: u32) -> Result<(), TaskError> {
        let percent = u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(TaskError::ProgressOutOfRange(percent))?;
        self.progress_percent = percent;
        Ok(())
    }

    /// Mark finished on `on`, at full progress.
    pub fn complete(&mut self, on: NaiveDate) {
        self.status = TaskStatus::Completed;
        self.completed_date = Some(on);
        self.progress_percent = 100;
    }

    /// Past its due date and neither completed nor cancelled.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => {
                !matches!(self.status, TaskStatus::Completed | TaskStatus::Cancelled) && today > due
            }
            None => false,
        }
    }

    /// Completed no later than its due date.
    pub fn is_on_time(&self) -> bool {
        match (self.status, self.due_date, self.completed_date) {
            (TaskStatus::Completed, Some(due), Some(done)) => done <= due,
            _ => false,
        }
    }
}
