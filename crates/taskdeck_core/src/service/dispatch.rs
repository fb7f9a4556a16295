//! Intent dispatch.
//!
//! # Responsibility
//! - Map renderer-reported user intents onto task store operations.
//! - Keep the rendering technology out of the core: a renderer only builds
//!   `Intent` values and reads `DispatchOutcome`s.
//!
//! # Invariants
//! - Intents are applied strictly in the order they are dispatched.
//! - Validation and not-found cases surface as `DispatchOutcome::Ignored`,
//!   never as errors.

use crate::model::task::{FilterMode, Priority, Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::{StoreError, TaskStore};
use chrono::NaiveDate;
use log::debug;

/// User intent reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddTask {
        text: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
    },
    ToggleTask(TaskId),
    DeleteTask(TaskId),
    EditTask {
        id: TaskId,
        text: String,
    },
    ClearCompleted,
    SetFilter(FilterMode),
    /// Full id sequence of the filtered view after a drop.
    ReorderTasks(Vec<TaskId>),
    /// Raw backup file contents.
    ImportTasks(String),
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Self::AddTask { .. } => "add_task",
            Self::ToggleTask(_) => "toggle_task",
            Self::DeleteTask(_) => "delete_task",
            Self::EditTask { .. } => "edit_task",
            Self::ClearCompleted => "clear_completed",
            Self::SetFilter(_) => "set_filter",
            Self::ReorderTasks(_) => "reorder_tasks",
            Self::ImportTasks(_) => "import_tasks",
        }
    }
}

/// Result of a dispatched intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Created(Task),
    Changed,
    Cleared(usize),
    Imported(usize),
    /// Nothing changed (blank text, unknown id, same order or filter).
    Ignored,
}

pub type DispatchError = StoreError;

/// Applies one intent to the store.
pub fn dispatch<R: TaskRepository>(
    store: &mut TaskStore<R>,
    intent: Intent,
) -> Result<DispatchOutcome, DispatchError> {
    let name = intent.name();
    let outcome = match intent {
        Intent::AddTask {
            text,
            priority,
            due_date,
        } => match store.add_task(text.as_str(), priority, due_date)? {
            Some(task) => DispatchOutcome::Created(task),
            None => DispatchOutcome::Ignored,
        },
        Intent::ToggleTask(id) => changed(store.toggle_task(id.as_str())?),
        Intent::DeleteTask(id) => changed(store.delete_task(id.as_str())?),
        Intent::EditTask { id, text } => changed(store.edit_task(id.as_str(), text.as_str())?),
        Intent::ClearCompleted => match store.clear_completed_tasks()? {
            0 => DispatchOutcome::Ignored,
            removed => DispatchOutcome::Cleared(removed),
        },
        Intent::SetFilter(mode) => {
            let previous = store.filter();
            store.set_filter(mode);
            changed(previous != mode)
        }
        Intent::ReorderTasks(ids) => changed(store.reorder_tasks(&ids)?),
        Intent::ImportTasks(payload) => {
            DispatchOutcome::Imported(store.import_tasks(payload.as_str())?)
        }
    };
    debug!(
        "event=dispatch module=service intent={name} outcome={}",
        outcome.label()
    );
    Ok(outcome)
}

impl DispatchOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Changed => "changed",
            Self::Cleared(_) => "cleared",
            Self::Imported(_) => "imported",
            Self::Ignored => "ignored",
        }
    }
}

fn changed(applied: bool) -> DispatchOutcome {
    if applied {
        DispatchOutcome::Changed
    } else {
        DispatchOutcome::Ignored
    }
}
