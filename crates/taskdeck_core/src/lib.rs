//! Core domain logic for taskdeck.
//! This crate is the single source of truth for task list invariants.

pub mod db;
pub mod filter;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod repo;
pub mod service;

pub use filter::{filter_tasks, EmptyState};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    generate_task_id, FilterMode, ParseEnumError, Priority, Task, TaskId, TaskValidationError,
};
pub use model::theme::Theme;
pub use reorder::resolve_order;
pub use repo::slot_store::{MemorySlotStore, SlotStore, SlotStoreError, SqliteSlotStore};
pub use repo::task_repo::{
    check_collection, export_file_name, export_snapshot, parse_snapshot, ImportError, RepoError,
    SlotTaskRepository, TaskRepository, REJECTED_TASKS_SLOT, TASKS_SLOT,
};
pub use repo::theme_repo::{ThemeRepository, THEME_SLOT};
pub use service::dispatch::{dispatch, DispatchError, DispatchOutcome, Intent};
pub use service::stats::{describe_due_date, is_overdue, PriorityBreakdown, TaskStats};
pub use service::task_store::{
    ChangeKind, ObserverId, StoreError, StoreObserver, StoreResult, TaskCounter, TaskStore,
    ViewSnapshot,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
