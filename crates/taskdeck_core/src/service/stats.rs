//! Task statistics and due-date labels.
//!
//! Both are read-only projections computed against a caller-supplied
//! `today`, so results are deterministic in tests.
//!
//! Overdue compares calendar dates: a task due today is not overdue until
//! tomorrow, whatever the time of day.

use crate::model::task::{Priority, Task};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Active task counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Active tasks whose due date is before `today`.
    pub overdue: usize,
    /// Counts active tasks only.
    pub by_priority: PriorityBreakdown,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            if task.completed {
                stats.completed += 1;
                continue;
            }
            stats.active += 1;
            if is_overdue(task, today) {
                stats.overdue += 1;
            }
            match task.priority {
                Priority::High => stats.by_priority.high += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::Low => stats.by_priority.low += 1,
            }
        }
        stats
    }
}

/// An active task is overdue once its due date has passed.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < today)
}

/// Human label for a due date relative to `today`.
///
/// Within a week the label is relative (`Today`, `In 3 days`, `2 days ago`);
/// beyond that it is `Mar 7`, with the year appended when it differs.
pub fn describe_due_date(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=7 => format!("In {days} days"),
        -7..=-2 => format!("{} days ago", -days),
        _ if due.year() == today.year() => due.format("%b %-d").to_string(),
        _ => due.format("%b %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_due_date, is_overdue, TaskStats};
    use crate::model::task::{Priority, Task};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn relative_labels_within_a_week() {
        let today = date(2026, 3, 10);
        assert_eq!(describe_due_date(today, today), "Today");
        assert_eq!(describe_due_date(date(2026, 3, 11), today), "Tomorrow");
        assert_eq!(describe_due_date(date(2026, 3, 9), today), "Yesterday");
        assert_eq!(describe_due_date(date(2026, 3, 17), today), "In 7 days");
        assert_eq!(describe_due_date(date(2026, 3, 5), today), "5 days ago");
    }

    #[test]
    fn absolute_labels_beyond_a_week() {
        let today = date(2026, 3, 10);
        assert_eq!(describe_due_date(date(2026, 3, 18), today), "Mar 18");
        assert_eq!(describe_due_date(date(2027, 1, 2), today), "Jan 2, 2027");
    }

    #[test]
    fn stats_count_active_priorities_and_overdue() {
        let today = date(2026, 3, 10);
        let mut late = Task::with_id("late", "pay rent").unwrap();
        late.priority = Priority::High;
        late.due_date = Some(date(2026, 3, 1));

        let mut due_today = Task::with_id("today", "call").unwrap();
        due_today.due_date = Some(today);

        let mut done = Task::with_id("done", "ship").unwrap();
        done.completed = true;
        done.priority = Priority::High;
        done.due_date = Some(date(2026, 2, 1));

        let tasks = vec![late.clone(), due_today.clone(), done.clone()];
        let stats = TaskStats::compute(&tasks, today);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.by_priority.high, 1);
        assert_eq!(stats.by_priority.low, 1);
        assert!(is_overdue(&late, today));
        assert!(!is_overdue(&due_today, today));
        assert!(!is_overdue(&done, today));
    }
}
