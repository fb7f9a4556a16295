//! CLI entry point for taskdeck.
//!
//! # Responsibility
//! - Parse flags, resolve configuration and start file logging.
//! - Open the slot database and hand one command to `commands::run`.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use taskdeck_core::{init_logging, FilterMode, Priority, SqliteSlotStore, Theme};

use config::{AppConfig, Overrides};
use render::Renderer;

mod commands;
mod config;
mod render;

/// Local to-do list backed by a SQLite slot store.
#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "taskdeck: a local to-do list")]
struct Cli {
    /// Database file (defaults to the per-user data directory).
    #[arg(long, global = true, env = "TASKDECK_DB")]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "TASKDECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, global = true, env = "TASKDECK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task at the top of the list.
    Add {
        text: String,
        #[arg(short, long, default_value_t = Priority::Low)]
        priority: Priority,
        /// Due date as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
    },

    /// Show tasks.
    List {
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },

    /// Flip a task between active and completed.
    Toggle { id: String },

    /// Replace a task's text.
    Edit { id: String, text: String },

    /// Delete a task.
    Delete { id: String },

    /// Delete every completed task.
    ClearCompleted,

    /// Commit a new order for the tasks shown under `--filter`.
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },

    /// Write a JSON backup of all tasks.
    Export {
        /// Defaults to todo-backup-<date>.json in the current directory.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of a backup file.
    Import { file: PathBuf },

    /// Show task statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Show or change the color theme preference.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

fn main() -> Result<()> {
    let Cli {
        db,
        log_level,
        log_dir,
        cmd,
    } = Cli::parse();

    let config = AppConfig::resolve(Overrides {
        db,
        log_level,
        log_dir,
    })?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let slots = SqliteSlotStore::open(&config.db_path).with_context(|| {
        format!(
            "failed to open task database `{}`",
            config.db_path.display()
        )
    })?;
    let renderer = Rc::new(Renderer::new(
        Local::now().date_naive(),
        std::io::stdout(),
    ));
    commands::run(cmd, &slots, renderer)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "taskdeck",
            "add",
            "Buy milk",
            "--priority",
            "high",
            "--due",
            "2026-10-20",
        ]);

        match cli.cmd {
            Command::Add {
                text,
                priority,
                due,
            } => {
                assert_eq!(text, "Buy milk");
                assert_eq!(priority, Priority::High);
                assert_eq!(due, NaiveDate::from_ymd_opt(2026, 10, 20));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_reorder_with_filter_and_global_db() {
        let cli = Cli::parse_from([
            "taskdeck", "reorder", "c1", "b2", "--filter", "active", "--db", "t.sqlite3",
        ]);

        assert_eq!(cli.db, Some(PathBuf::from("t.sqlite3")));
        match cli.cmd {
            Command::Reorder { ids, filter } => {
                assert_eq!(ids, vec!["c1", "b2"]);
                assert_eq!(filter, FilterMode::Active);
            }
            _ => panic!("expected reorder command"),
        }
    }

    #[test]
    fn parse_theme_set() {
        let cli = Cli::parse_from(["taskdeck", "theme", "set", "dark"]);
        match cli.cmd {
            Command::Theme { action } => {
                assert_eq!(action, Some(ThemeAction::Set { theme: Theme::Dark }));
            }
            _ => panic!("expected theme command"),
        }
    }

    #[test]
    fn rejects_bad_due_date_and_unknown_filter() {
        assert!(Cli::try_parse_from(["taskdeck", "add", "x", "--due", "tomorrow"]).is_err());
        assert!(Cli::try_parse_from(["taskdeck", "list", "--filter", "done"]).is_err());
        assert!(Cli::try_parse_from(["taskdeck", "reorder"]).is_err());
    }

    #[test]
    fn list_defaults_to_all() {
        let cli = Cli::parse_from(["taskdeck", "list"]);
        assert!(matches!(
            cli.cmd,
            Command::List {
                filter: FilterMode::All
            }
        ));
    }
}
