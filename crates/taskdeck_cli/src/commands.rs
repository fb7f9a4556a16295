//! Command execution for one CLI invocation.
//!
//! Mutating commands go through `taskdeck_core::dispatch`; the renderer is
//! subscribed as the store observer and prints the updated view.

use anyhow::{bail, Context, Result};
use log::info;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use taskdeck_core::{
    dispatch, export_file_name, filter_tasks, DispatchOutcome, FilterMode, Intent, SlotStore,
    SlotTaskRepository, Task, TaskId, TaskStats, TaskStore, ThemeRepository,
};

use crate::render::{render_stats, Renderer};
use crate::{Command, ThemeAction};

pub(crate) fn run<S, W>(command: Command, slots: &S, renderer: Rc<Renderer<W>>) -> Result<()>
where
    S: SlotStore,
    W: Write + 'static,
{
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&command)
    );

    if let Command::Theme { action } = command {
        return run_theme(&ThemeRepository::new(slots), action, &renderer);
    }

    let mut store = TaskStore::hydrate(SlotTaskRepository::new(slots));
    match command {
        Command::List { filter } => {
            store.set_filter(filter);
            renderer.show(&store.view())?;
        }
        Command::Stats { json } => {
            let stats = TaskStats::compute(store.tasks(), renderer.today());
            if json {
                renderer.line(&serde_json::to_string_pretty(&stats)?)?;
            } else {
                renderer.line(render_stats(&stats).trim_end())?;
            }
        }
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(renderer.today())));
            let payload = store.export_tasks()?;
            std::fs::write(&path, payload)
                .with_context(|| format!("failed to write backup `{}`", path.display()))?;
            renderer.line(&format!(
                "Exported {} tasks to {}",
                store.tasks().len(),
                path.display()
            ))?;
        }
        other => {
            let (filter, intent) = build_intent(other, store.tasks())?;
            store.set_filter(filter);
            store.subscribe(renderer.clone());
            let outcome = dispatch(&mut store, intent)?;
            report(&outcome, &renderer)?;
        }
    }
    Ok(())
}

/// Maps a mutating command onto the filter it runs under and its intent.
fn build_intent(command: Command, tasks: &[Task]) -> Result<(FilterMode, Intent)> {
    let intent = match command {
        Command::Add {
            text,
            priority,
            due,
        } => Intent::AddTask {
            text,
            priority,
            due_date: due,
        },
        Command::Toggle { id } => Intent::ToggleTask(resolve_id(tasks, &id)?),
        Command::Edit { id, text } => Intent::EditTask {
            id: resolve_id(tasks, &id)?,
            text,
        },
        Command::Delete { id } => Intent::DeleteTask(resolve_id(tasks, &id)?),
        Command::ClearCompleted => Intent::ClearCompleted,
        Command::Reorder { ids, filter } => {
            let ids = ids
                .iter()
                .map(|id| resolve_id(tasks, id))
                .collect::<Result<Vec<_>>>()?;
            ensure_full_view(tasks, filter, &ids)?;
            return Ok((filter, Intent::ReorderTasks(ids)));
        }
        Command::Import { file } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            Intent::ImportTasks(payload)
        }
        Command::List { .. }
        | Command::Stats { .. }
        | Command::Export { .. }
        | Command::Theme { .. } => bail!("`{}` does not change tasks", command_name(&command)),
    };
    Ok((FilterMode::All, intent))
}

/// A reorder must list every task shown under `filter`, each exactly once.
fn ensure_full_view(tasks: &[Task], filter: FilterMode, ids: &[TaskId]) -> Result<()> {
    let mut given = HashSet::with_capacity(ids.len());
    for id in ids {
        if !given.insert(id.as_str()) {
            bail!("task `{id}` is listed more than once");
        }
    }

    let shown: HashSet<&str> = filter_tasks(tasks, filter)
        .into_iter()
        .map(|task| task.id.as_str())
        .collect();
    if given != shown {
        bail!(
            "reorder needs all {} tasks shown under `{filter}`, got {}",
            shown.len(),
            given.len()
        );
    }
    Ok(())
}

fn report<W: Write>(outcome: &DispatchOutcome, renderer: &Renderer<W>) -> Result<()> {
    match outcome {
        DispatchOutcome::Created(_) | DispatchOutcome::Changed => {}
        DispatchOutcome::Cleared(removed) => {
            renderer.line(&format!("Cleared {removed} completed tasks."))?
        }
        DispatchOutcome::Imported(count) => renderer.line(&format!("Imported {count} tasks."))?,
        DispatchOutcome::Ignored => renderer.line("Nothing changed.")?,
    }
    Ok(())
}

/// Resolves a full id or a unique id prefix.
fn resolve_id(tasks: &[Task], needle: &str) -> Result<TaskId> {
    let needle = needle.trim();
    if needle.is_empty() {
        bail!("task id must not be empty");
    }
    if let Some(task) = tasks.iter().find(|task| task.id == needle) {
        return Ok(task.id.clone());
    }

    let mut candidates = tasks.iter().filter(|task| task.id.starts_with(needle));
    match (candidates.next(), candidates.count()) {
        (Some(task), 0) => Ok(task.id.clone()),
        (Some(_), others) => bail!(
            "task id prefix `{needle}` is ambiguous ({} matches)",
            others + 1
        ),
        (None, _) => bail!("no task matches `{needle}`"),
    }
}

fn run_theme<S: SlotStore, W: Write>(
    themes: &ThemeRepository<S>,
    action: Option<ThemeAction>,
    renderer: &Renderer<W>,
) -> Result<()> {
    let theme = match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => themes.load_theme(),
        ThemeAction::Toggle => themes.toggle_theme()?,
        ThemeAction::Set { theme } => {
            themes.save_theme(theme)?;
            theme
        }
    };
    renderer.line(&format!("Theme: {theme}"))?;
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List { .. } => "list",
        Command::Toggle { .. } => "toggle",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::ClearCompleted => "clear-completed",
        Command::Reorder { .. } => "reorder",
        Command::Export { .. } => "export",
        Command::Import { .. } => "import",
        Command::Stats { .. } => "stats",
        Command::Theme { .. } => "theme",
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_id, run};
    use crate::render::Renderer;
    use crate::{Command, ThemeAction};
    use chrono::NaiveDate;
    use std::rc::Rc;
    use taskdeck_core::{
        FilterMode, MemorySlotStore, Priority, SlotTaskRepository, Task, TaskRepository, Theme,
    };

    fn renderer() -> Rc<Renderer<Vec<u8>>> {
        Rc::new(Renderer::new(
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            Vec::new(),
        ))
    }

    fn seeded(ids: &[(&str, bool)]) -> MemorySlotStore {
        let slots = MemorySlotStore::new();
        let tasks: Vec<Task> = ids
            .iter()
            .map(|(id, completed)| {
                let mut task = Task::with_id(*id, &format!("task {id}")).unwrap();
                task.completed = *completed;
                task
            })
            .collect();
        SlotTaskRepository::new(&slots).save_tasks(&tasks).unwrap();
        slots
    }

    fn stored_ids(slots: &MemorySlotStore) -> Vec<String> {
        SlotTaskRepository::new(slots)
            .load_tasks()
            .into_iter()
            .map(|task| task.id)
            .collect()
    }

    #[test]
    fn resolve_id_accepts_unique_prefix_and_exact_match() {
        let tasks = vec![
            Task::with_id("abc1", "x").unwrap(),
            Task::with_id("abc2", "y").unwrap(),
            Task::with_id("abc", "z").unwrap(),
        ];

        assert_eq!(resolve_id(&tasks, "abc1").unwrap(), "abc1");
        assert_eq!(resolve_id(&tasks, "abc").unwrap(), "abc");
        assert!(resolve_id(&tasks, "ab")
            .unwrap_err()
            .to_string()
            .contains("ambiguous (3 matches)"));
        assert!(resolve_id(&tasks, "zz").is_err());
        assert!(resolve_id(&tasks, " ").is_err());
    }

    #[test]
    fn add_prints_updated_view() {
        let slots = MemorySlotStore::new();
        let out = renderer();
        let command = Command::Add {
            text: "Buy milk".to_string(),
            priority: Priority::High,
            due: NaiveDate::from_ymd_opt(2026, 3, 11),
        };

        run(command, &slots, out.clone()).unwrap();

        let text = out.output();
        assert!(text.starts_with("Tasks (all) - 1 task remaining\n"));
        assert!(text.contains("Buy milk  (high, due Tomorrow)"));
        assert_eq!(stored_ids(&slots).len(), 1);
    }

    #[test]
    fn toggle_by_prefix_persists() {
        let slots = seeded(&[("alpha-1", false), ("beta-2", false)]);

        run(
            Command::Toggle {
                id: "bet".to_string(),
            },
            &slots,
            renderer(),
        )
        .unwrap();

        let tasks = SlotTaskRepository::new(&slots).load_tasks();
        assert!(!tasks[0].completed);
        assert!(tasks[1].completed);
    }

    #[test]
    fn reorder_under_filter_keeps_hidden_tasks_stable() {
        let slots = seeded(&[("A", true), ("B", false), ("C", false), ("D", true)]);
        let out = renderer();

        run(
            Command::Reorder {
                ids: vec!["C".to_string(), "B".to_string()],
                filter: FilterMode::Active,
            },
            &slots,
            out.clone(),
        )
        .unwrap();

        assert_eq!(stored_ids(&slots), ["A", "D", "C", "B"]);
        assert!(out.output().starts_with("Tasks (active) - 2 tasks remaining\n"));
    }

    #[test]
    fn reorder_must_list_the_whole_filtered_view() {
        let slots = seeded(&[("A", false), ("B", false), ("C", false), ("D", false)]);
        fn reorder(ids: &[&str], filter: FilterMode) -> Command {
            Command::Reorder {
                ids: ids.iter().map(|id| id.to_string()).collect(),
                filter,
            }
        }

        let partial = run(reorder(&["C", "B"], FilterMode::All), &slots, renderer()).unwrap_err();
        assert!(partial.to_string().contains("all 4 tasks shown under `all`"));

        let repeated = run(
            reorder(&["C", "B", "A", "C"], FilterMode::All),
            &slots,
            renderer(),
        )
        .unwrap_err();
        assert!(repeated.to_string().contains("more than once"));

        let hidden = run(reorder(&["B", "A"], FilterMode::Completed), &slots, renderer())
            .unwrap_err();
        assert!(hidden.to_string().contains("all 0 tasks shown under `completed`"));

        assert_eq!(stored_ids(&slots), ["A", "B", "C", "D"]);

        run(reorder(&["D", "C", "B", "A"], FilterMode::All), &slots, renderer()).unwrap();
        assert_eq!(stored_ids(&slots), ["D", "C", "B", "A"]);
    }

    #[test]
    fn clear_completed_with_nothing_to_clear_reports_no_change() {
        let slots = seeded(&[("A", false)]);
        let out = renderer();

        run(Command::ClearCompleted, &slots, out.clone()).unwrap();
        assert_eq!(out.output(), "Nothing changed.\n");
    }

    #[test]
    fn export_then_import_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        let source = seeded(&[("A", true), ("B", false)]);

        run(
            Command::Export {
                out: Some(backup.clone()),
            },
            &source,
            renderer(),
        )
        .unwrap();

        let target = seeded(&[("Z", false)]);
        let out = renderer();
        run(Command::Import { file: backup }, &target, out.clone()).unwrap();

        assert_eq!(stored_ids(&target), ["A", "B"]);
        assert!(out.output().ends_with("Imported 2 tasks.\n"));
    }

    #[test]
    fn invalid_import_file_is_reported_and_nothing_changes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"{"tasks":[]}"#).unwrap();
        let slots = seeded(&[("A", false)]);

        let err = run(Command::Import { file }, &slots, renderer()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid task file format");
        assert_eq!(stored_ids(&slots), ["A"]);
    }

    #[test]
    fn stats_json_uses_camel_case_keys() {
        let slots = seeded(&[("A", true), ("B", false)]);
        let out = renderer();

        run(Command::Stats { json: true }, &slots, out.clone()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out.output()).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["byPriority"]["low"], 1);
    }

    #[test]
    fn theme_toggle_then_show() {
        let slots = MemorySlotStore::new();

        run(
            Command::Theme {
                action: Some(ThemeAction::Toggle),
            },
            &slots,
            renderer(),
        )
        .unwrap();
        let out = renderer();
        run(Command::Theme { action: None }, &slots, out.clone()).unwrap();

        assert_eq!(out.output(), format!("Theme: {}\n", Theme::Dark));
    }
}
