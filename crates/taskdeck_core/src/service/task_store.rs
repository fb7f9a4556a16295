//! Task store: the session-wide source of truth for the task list.
//!
//! # Responsibility
//! - Own the canonical ordered collection and the active filter.
//! - Apply collaborator intents (add/toggle/edit/delete/clear/reorder/import).
//! - Persist after every committed mutation and notify observers.
//!
//! # Invariants
//! - Task ids are unique within the collection at all times.
//! - Blank text and unknown ids are silent no-ops: nothing is persisted and
//!   no observer is notified.
//! - Toggle, edit and delete never move unrelated tasks.
//! - Persistence runs synchronously right after the in-memory change; a
//!   failed write keeps the in-memory change and is reported to the caller.

use crate::filter::{filter_tasks, EmptyState};
use crate::model::task::{FilterMode, Priority, Task, TaskId};
use crate::reorder::resolve_order;
use crate::repo::task_repo::{
    check_collection, export_snapshot, parse_snapshot, ImportError, RepoError, TaskRepository,
};
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure surfaced by task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The mutation was applied in memory but could not be written.
    Persistence(RepoError),
    /// An import payload was rejected; the collection is unchanged.
    Import(ImportError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "failed to save tasks: {err}"),
            Self::Import(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Import(err) => Some(err),
        }
    }
}

impl From<ImportError> for StoreError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// What changed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Toggled,
    Edited,
    Deleted,
    ClearedCompleted,
    /// Canonical order changed after a drop. The renderer already shows the
    /// new order, so redrawing is optional.
    Reordered,
    /// Whole collection replaced by an import.
    Replaced,
    FilterChanged,
}

/// Active/total task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounter {
    pub active: usize,
    pub total: usize,
}

impl TaskCounter {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            active: tasks.iter().filter(|task| task.is_active()).count(),
            total: tasks.len(),
        }
    }

    /// Counter label shown next to the list.
    pub fn display_text(&self) -> String {
        match (self.total, self.active) {
            (0, _) => "0 tasks".to_string(),
            (_, 0) => "All tasks completed!".to_string(),
            (_, 1) => "1 task remaining".to_string(),
            (_, active) => format!("{active} tasks remaining"),
        }
    }
}

/// Render input handed to observers after each change.
#[derive(Debug)]
pub struct ViewSnapshot<'a> {
    pub filter: FilterMode,
    /// Visible tasks in canonical order.
    pub tasks: Vec<&'a Task>,
    pub counter: TaskCounter,
}

impl ViewSnapshot<'_> {
    /// Placeholder to show instead of the list, when nothing is visible.
    pub fn empty_state(&self) -> Option<EmptyState> {
        self.tasks
            .is_empty()
            .then(|| EmptyState::for_mode(self.filter))
    }

    pub fn visible_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|task| task.id.clone()).collect()
    }
}

/// Presentation hook notified after every committed change.
pub trait StoreObserver {
    fn on_change(&self, change: ChangeKind, view: &ViewSnapshot<'_>);
}

/// Handle returned by `TaskStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Session context owning the task collection.
///
/// Construct once at startup with `hydrate` and hand `&mut` access to the
/// dispatcher; there is no global instance.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    filter: FilterMode,
    observers: Vec<(ObserverId, Rc<dyn StoreObserver>)>,
    next_observer_id: u64,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Loads the persisted collection and starts with the `all` filter.
    pub fn hydrate(repo: R) -> Self {
        let tasks = repo.load_tasks();
        info!(
            "event=store_hydrate module=service status=ok count={}",
            tasks.len()
        );
        Self {
            repo,
            tasks,
            filter: FilterMode::All,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Canonical collection, most recent first unless reordered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.filter)
    }

    pub fn task_counter(&self) -> TaskCounter {
        TaskCounter::from_tasks(&self.tasks)
    }

    pub fn view(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            filter: self.filter,
            tasks: self.filtered_tasks(),
            counter: self.task_counter(),
        }
    }

    pub fn subscribe(&mut self, observer: Rc<dyn StoreObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Creates a task at the front of the collection.
    ///
    /// Returns `Ok(None)` when `text` is blank after trimming.
    pub fn add_task(
        &mut self,
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> StoreResult<Option<Task>> {
        let Ok(task) = Task::new(text, priority, due_date) else {
            info!("event=task_create module=service status=skipped reason=blank_text");
            return Ok(None);
        };

        self.tasks.insert(0, task.clone());
        info!(
            "event=task_create module=service status=ok task_id={} priority={} has_due_date={}",
            task.id,
            task.priority,
            task.due_date.is_some()
        );
        self.commit(ChangeKind::Created)?;
        Ok(Some(task))
    }

    /// Flips `completed`. Returns `Ok(false)` for an unknown id.
    pub fn toggle_task(&mut self, id: &str) -> StoreResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        info!(
            "event=task_toggle module=service status=ok task_id={} completed={}",
            id, task.completed
        );
        self.commit(ChangeKind::Toggled)?;
        Ok(true)
    }

    /// Replaces the text with trimmed `new_text`.
    ///
    /// Blank `new_text` or an unknown id keeps the task untouched and
    /// returns `Ok(false)`.
    pub fn edit_task(&mut self, id: &str, new_text: &str) -> StoreResult<bool> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.text = trimmed.to_string();
        info!("event=task_edit module=service status=ok task_id={id}");
        self.commit(ChangeKind::Edited)?;
        Ok(true)
    }

    /// Removes the task. Returns `Ok(false)` for an unknown id.
    pub fn delete_task(&mut self, id: &str) -> StoreResult<bool> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };
        self.tasks.remove(index);
        info!("event=task_delete module=service status=ok task_id={id}");
        self.commit(ChangeKind::Deleted)?;
        Ok(true)
    }

    /// Removes every completed task in one step and returns how many went.
    pub fn clear_completed_tasks(&mut self) -> StoreResult<usize> {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(0);
        }
        info!("event=tasks_clear_completed module=service status=ok removed={removed}");
        self.commit(ChangeKind::ClearedCompleted)?;
        Ok(removed)
    }

    /// Commits the order a renderer shows after a drop.
    ///
    /// `displayed_ids` is the full id sequence of the current filtered view.
    pub fn reorder_tasks(&mut self, displayed_ids: &[TaskId]) -> StoreResult<bool> {
        if !resolve_order(&mut self.tasks, displayed_ids) {
            return Ok(false);
        }
        info!(
            "event=tasks_reorder module=service status=ok filter={} displayed={}",
            self.filter,
            displayed_ids.len()
        );
        self.commit(ChangeKind::Reordered)?;
        Ok(true)
    }

    /// Changes the active filter; never persisted.
    pub fn set_filter(&mut self, mode: FilterMode) {
        if self.filter == mode {
            return;
        }
        self.filter = mode;
        self.notify(ChangeKind::FilterChanged);
    }

    /// Validates `serialized` and replaces the whole collection with it.
    ///
    /// # Errors
    /// - `StoreError::Import` when the payload is rejected; nothing changes.
    /// - `StoreError::Persistence` when the replacement could not be saved.
    pub fn import_tasks(&mut self, serialized: &str) -> StoreResult<usize> {
        let tasks = match parse_snapshot(serialized) {
            Ok(tasks) => tasks,
            Err(err) => {
                error!("event=tasks_import module=service status=error error={err}");
                return Err(err.into());
            }
        };
        let count = tasks.len();
        self.replace_all(tasks)?;
        Ok(count)
    }

    /// Replaces the whole collection.
    ///
    /// # Errors
    /// - `StoreError::Import` when a record is invalid or an id repeats;
    ///   the current collection is kept.
    /// - `StoreError::Persistence` when the replacement could not be saved.
    pub fn replace_all(&mut self, tasks: Vec<Task>) -> StoreResult<()> {
        if let Err(err) = check_collection(&tasks) {
            error!("event=tasks_replace module=service status=error error={err}");
            return Err(err.into());
        }
        self.tasks = tasks;
        info!(
            "event=tasks_replace module=service status=ok count={}",
            self.tasks.len()
        );
        self.commit(ChangeKind::Replaced)
    }

    /// Backup snapshot of the canonical collection.
    pub fn export_tasks(&self) -> StoreResult<String> {
        export_snapshot(&self.tasks).map_err(|err| StoreError::Persistence(err.into()))
    }

    fn commit(&self, change: ChangeKind) -> StoreResult<()> {
        let saved = self.repo.save_tasks(&self.tasks);
        if let Err(err) = &saved {
            error!(
                "event=tasks_save module=service status=error change={:?} error={}",
                change, err
            );
        }
        self.notify(change);
        saved.map_err(StoreError::Persistence)
    }

    fn notify(&self, change: ChangeKind) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.view();
        for (_, observer) in &self.observers {
            observer.on_change(change, &view);
        }
    }
}
