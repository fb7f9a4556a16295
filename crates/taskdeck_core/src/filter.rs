//! Filter engine and empty-state contract.
//!
//! Filtering is a pure projection of the canonical collection: it never
//! mutates, persists or reorders.

use crate::model::task::{FilterMode, Task};

/// Returns the tasks visible under `mode`, in canonical order.
pub fn filter_tasks(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

/// Placeholder shown by a renderer when a filtered view is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub text: &'static str,
}

impl EmptyState {
    pub fn for_mode(mode: FilterMode) -> Self {
        match mode {
            FilterMode::All => Self {
                icon: "📝",
                text: "No tasks yet. Add one above to get started!",
            },
            FilterMode::Active => Self {
                icon: "✅",
                text: "All tasks completed! Great job!",
            },
            FilterMode::Completed => Self {
                icon: "📋",
                text: "No completed tasks yet.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_tasks, EmptyState};
    use crate::model::task::{FilterMode, Task};
    use std::collections::HashSet;

    fn fixture() -> Vec<Task> {
        ["a", "b", "c", "d", "e"]
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let mut task = Task::with_id(*id, id).unwrap();
                task.completed = index % 2 == 0;
                task
            })
            .collect()
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.id.clone()).collect()
    }

    #[test]
    fn all_is_identity() {
        let tasks = fixture();
        assert_eq!(ids(&filter_tasks(&tasks, FilterMode::All)), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn active_and_completed_partition_the_collection() {
        let tasks = fixture();
        let active = ids(&filter_tasks(&tasks, FilterMode::Active));
        let completed = ids(&filter_tasks(&tasks, FilterMode::Completed));

        assert_eq!(active, ["b", "d"]);
        assert_eq!(completed, ["a", "c", "e"]);

        let active_set: HashSet<_> = active.iter().collect();
        let completed_set: HashSet<_> = completed.iter().collect();
        assert!(active_set.is_disjoint(&completed_set));
        assert_eq!(active_set.len() + completed_set.len(), tasks.len());
    }

    #[test]
    fn empty_state_is_mode_specific() {
        assert_eq!(EmptyState::for_mode(FilterMode::All).icon, "📝");
        assert_eq!(
            EmptyState::for_mode(FilterMode::Active).text,
            "All tasks completed! Great job!"
        );
        assert_eq!(
            EmptyState::for_mode(FilterMode::Completed).text,
            "No completed tasks yet."
        );
    }
}
