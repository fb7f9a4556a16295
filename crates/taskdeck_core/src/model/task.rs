//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the `todoTasks` slot.
//! - Own task id generation and record-level validation.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused for another task.
//! - `text` is stored trimmed and is never empty.
//! - `created_at` is fixed at creation and never mutated.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque task identifier.
///
/// Kept as a plain string so ids produced by older exports stay valid.
pub type TaskId = String;

/// Generates a fresh task id.
///
/// UUIDv7 combines a millisecond timestamp with random bits, so ids sort
/// roughly by creation time and collisions are negligible.
pub fn generate_task_id() -> TaskId {
    Uuid::now_v7().to_string()
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseEnumError {
                kind: "priority",
                value: other.to_string(),
                expected: "low|medium|high",
            }),
        }
    }
}

/// Subset selector applied to the canonical collection for display.
///
/// Transient UI state; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Returns whether `task` is visible under this mode.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseEnumError {
                kind: "filter",
                value: other.to_string(),
                expected: "all|active|completed",
            }),
        }
    }
}

/// Error returned when parsing a wire enum from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl Display for ParseEnumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported {} `{}`; expected {}",
            self.kind, self.value, self.expected
        )
    }
}

impl Error for ParseEnumError {}

/// Validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::EmptyText => write!(f, "task text must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Field names follow the persisted JSON layout (`dueDate`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    /// Calendar date only; absent means no deadline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an active task with a generated id.
    ///
    /// `text` is trimmed; blank input is rejected.
    pub fn new(
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, TaskValidationError> {
        let mut task = Self::with_id(generate_task_id(), text)?;
        task.priority = priority;
        task.due_date = due_date;
        Ok(task)
    }

    /// Creates an active, low-priority task with a caller-provided id.
    ///
    /// Used by fixtures and import paths where identity already exists.
    pub fn with_id(id: impl Into<TaskId>, text: &str) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: id.into(),
            text: text.trim().to_string(),
            completed: false,
            priority: Priority::default(),
            due_date: None,
            created_at: Utc::now(),
        };
        task.validate()?;
        Ok(task)
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}
