//! Plain-text rendering of the task view.
//!
//! # Responsibility
//! - Turn `ViewSnapshot`s into terminal lines.
//! - Act as the store observer for one CLI invocation.
//!
//! # Invariants
//! - Rendering never mutates store state.
//! - Write failures are logged and swallowed inside `on_change`.

use chrono::NaiveDate;
use log::warn;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::io::{self, Write};
use taskdeck_core::{
    describe_due_date, is_overdue, ChangeKind, Priority, StoreObserver, Task, TaskStats,
    ViewSnapshot,
};

const MIN_ID_WIDTH: usize = 8;

/// Terminal observer owning the output sink.
pub struct Renderer<W: Write> {
    today: NaiveDate,
    out: RefCell<W>,
}

impl<W: Write> Renderer<W> {
    pub fn new(today: NaiveDate, out: W) -> Self {
        Self {
            today,
            out: RefCell::new(out),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Writes one message line.
    pub fn line(&self, text: &str) -> io::Result<()> {
        writeln!(self.out.borrow_mut(), "{text}")
    }

    pub fn show(&self, view: &ViewSnapshot<'_>) -> io::Result<()> {
        let text = render_view(view, self.today);
        let mut out = self.out.borrow_mut();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

impl<W: Write> StoreObserver for Renderer<W> {
    fn on_change(&self, change: ChangeKind, view: &ViewSnapshot<'_>) {
        if let Err(err) = self.show(view) {
            warn!("event=render module=cli status=error change={change:?} error={err}");
        }
    }
}

/// Renders the filtered list with its counter line.
pub fn render_view(view: &ViewSnapshot<'_>, today: NaiveDate) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "Tasks ({}) - {}",
        view.filter,
        view.counter.display_text()
    );

    if let Some(empty) = view.empty_state() {
        let _ = writeln!(text, "  {} {}", empty.icon, empty.text);
        return text;
    }

    let width = id_width(&view.tasks);
    for task in &view.tasks {
        let _ = writeln!(text, "  {}", render_task(task, width, today));
    }
    text
}

fn render_task(task: &Task, id_width: usize, today: NaiveDate) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let id = task.id.get(..id_width).unwrap_or(&task.id);
    let mut line = format!("{mark} {id:<id_width$}  {}", task.text);

    let mut tags = Vec::new();
    if task.priority != Priority::Low {
        tags.push(task.priority.to_string());
    }
    if let Some(due) = task.due_date {
        let label = describe_due_date(due, today);
        if is_overdue(task, today) {
            tags.push(format!("due {label}, overdue"));
        } else {
            tags.push(format!("due {label}"));
        }
    }
    if !tags.is_empty() {
        let _ = write!(line, "  ({})", tags.join(", "));
    }
    line
}

/// Shortest prefix length (at least 8) keeping every shown id distinct.
fn id_width(tasks: &[&Task]) -> usize {
    let longest = tasks.iter().map(|task| task.id.len()).max().unwrap_or(0);
    let mut width = MIN_ID_WIDTH.min(longest);
    while width < longest {
        let mut prefixes: Vec<&str> = tasks
            .iter()
            .map(|task| task.id.get(..width).unwrap_or(&task.id))
            .collect();
        prefixes.sort_unstable();
        if prefixes.windows(2).all(|pair| pair[0] != pair[1]) {
            break;
        }
        width += 1;
    }
    width
}

pub fn render_stats(stats: &TaskStats) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Total:     {}", stats.total);
    let _ = writeln!(text, "Active:    {}", stats.active);
    let _ = writeln!(text, "Completed: {}", stats.completed);
    let _ = writeln!(text, "Overdue:   {}", stats.overdue);
    let _ = writeln!(
        text,
        "Active by priority: high {}, medium {}, low {}",
        stats.by_priority.high, stats.by_priority.medium, stats.by_priority.low
    );
    text
}

#[cfg(test)]
impl Renderer<Vec<u8>> {
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.out.borrow()).into_owned()
    }
}
