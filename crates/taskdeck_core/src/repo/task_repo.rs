//! Task collection persistence adapter.
//!
//! # Responsibility
//! - Serialize the canonical collection into the `todoTasks` slot.
//! - Hydrate the collection at startup, failing open on bad data.
//! - Produce backup snapshots and validate imported snapshots.
//!
//! # Invariants
//! - `save` always writes the full collection; there is no partial write.
//! - `load` never fails: missing, unreadable or invalid data yields `[]`.
//!   The next `save` overwrites the slot, so a rejected payload is first
//!   copied to `todoTasks.rejected` and survives there.
//! - A snapshot is accepted only when it is a JSON array of valid tasks with
//!   unique ids; anything else is rejected without side effects.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::slot_store::{SlotStore, SlotStoreError};
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized collection.
pub const TASKS_SLOT: &str = "todoTasks";

/// Last `todoTasks` payload that failed validation on load.
pub const REJECTED_TASKS_SLOT: &str = "todoTasks.rejected";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence write failure.
#[derive(Debug)]
pub enum RepoError {
    Slot(SlotStoreError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slot(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<SlotStoreError> for RepoError {
    fn from(value: SlotStoreError) -> Self {
        Self::Slot(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Reason a serialized snapshot was rejected.
#[derive(Debug)]
pub enum ImportError {
    /// Input is not JSON at all.
    Malformed(serde_json::Error),
    /// Input is JSON but the top level is not an array.
    NotAnArray,
    /// An element does not have the task shape.
    InvalidRecord {
        index: usize,
        source: serde_json::Error,
    },
    /// An element has the task shape but breaks a record invariant.
    InvalidTask {
        index: usize,
        source: TaskValidationError,
    },
    DuplicateId(TaskId),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "Error importing tasks: {err}"),
            Self::NotAnArray => write!(f, "Invalid task file format"),
            Self::InvalidRecord { index, source } => {
                write!(f, "Invalid task file format: entry {index}: {source}")
            }
            Self::InvalidTask { index, source } => {
                write!(f, "Invalid task file format: entry {index}: {source}")
            }
            Self::DuplicateId(id) => {
                write!(f, "Invalid task file format: duplicate task id `{id}`")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::InvalidTask { source, .. } => Some(source),
            Self::NotAnArray | Self::DuplicateId(_) => None,
        }
    }
}

/// Persistence contract the task store writes through.
pub trait TaskRepository {
    /// Overwrites the persisted collection.
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
    /// Reads the persisted collection; returns `[]` on any failure.
    fn load_tasks(&self) -> Vec<Task>;
}

/// Task repository persisting into a `SlotStore`.
pub struct SlotTaskRepository<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> SlotTaskRepository<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Underlying slot store, shared with other slot-backed repositories.
    pub fn slots(&self) -> &S {
        &self.slots
    }
}

impl<S: SlotStore> TaskRepository for SlotTaskRepository<S> {
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let payload = serde_json::to_string(tasks)?;
        self.slots.write_slot(TASKS_SLOT, payload.as_str())?;
        Ok(())
    }

    fn load_tasks(&self) -> Vec<Task> {
        let payload = match self.slots.read_slot(TASKS_SLOT) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                info!("event=tasks_load module=repo status=empty reason=slot_missing");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=fallback error_code=slot_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        match parse_snapshot(payload.as_str()) {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=repo status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=fallback error_code=slot_corrupt payload_bytes={} error={}",
                    payload.len(),
                    err
                );
                if let Err(err) = self.slots.write_slot(REJECTED_TASKS_SLOT, payload.as_str()) {
                    warn!(
                        "event=tasks_quarantine module=repo status=error error={}",
                        err
                    );
                }
                Vec::new()
            }
        }
    }
}

/// Parses a serialized snapshot (slot value or backup file).
///
/// # Errors
/// Returns the first violation found; the input is never partially accepted.
pub fn parse_snapshot(serialized: &str) -> Result<Vec<Task>, ImportError> {
    let value: Value = serde_json::from_str(serialized).map_err(ImportError::Malformed)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let tasks = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Task>(item)
                .map_err(|source| ImportError::InvalidRecord { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_collection(&tasks)?;
    Ok(tasks)
}

/// Checks every record and id uniqueness across the collection.
///
/// # Errors
/// `InvalidTask` for the first invalid record, `DuplicateId` for the first
/// repeated id.
pub fn check_collection(tasks: &[Task]) -> Result<(), ImportError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        task.validate()
            .map_err(|source| ImportError::InvalidTask { index, source })?;
        if !seen.insert(task.id.as_str()) {
            return Err(ImportError::DuplicateId(task.id.clone()));
        }
    }
    Ok(())
}

/// Serializes a backup snapshot in the slot format, indented for humans.
pub fn export_snapshot(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tasks)
}

/// Backup file name for a snapshot taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("todo-backup-{}.json", date.format("%Y-%m-%d"))
}
