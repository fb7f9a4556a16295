//! Runtime configuration for the `taskdeck` binary.
//!
//! # Responsibility
//! - Merge flag/env overrides with per-user defaults.
//! - Hand absolute paths to the core, which rejects relative log dirs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "taskdeck";
const DB_FILE_NAME: &str = "taskdeck.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Overrides collected from flags and `TASKDECK_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Self::resolve_with(overrides, &cwd, dirs::data_local_dir())
    }

    /// `data_root` is the platform data directory, when there is one.
    pub fn resolve_with(
        overrides: Overrides,
        cwd: &Path,
        data_root: Option<PathBuf>,
    ) -> Result<Self> {
        let app_dir = || {
            data_root
                .as_ref()
                .map(|root| root.join(APP_DIR))
                .context("no local data directory on this platform; pass --db and --log-dir")
        };

        let db_path = match overrides.db {
            Some(path) => absolutize(cwd, path),
            None => app_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match overrides.log_dir {
            Some(path) => absolutize(cwd, path),
            None => app_dir()?.join(LOG_DIR_NAME),
        };
        let log_level = overrides
            .log_level
            .unwrap_or_else(|| taskdeck_core::default_log_level().to_string());

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Overrides};
    use std::path::{Path, PathBuf};

    #[test]
    fn defaults_live_under_the_data_directory() {
        let config = AppConfig::resolve_with(
            Overrides::default(),
            Path::new("/work"),
            Some(PathBuf::from("/home/ada/.local/share")),
        )
        .unwrap();

        assert_eq!(
            config.db_path,
            PathBuf::from("/home/ada/.local/share/taskdeck/taskdeck.sqlite3")
        );
        assert_eq!(
            config.log_dir,
            PathBuf::from("/home/ada/.local/share/taskdeck/logs")
        );
        assert_eq!(config.log_level, taskdeck_core::default_log_level());
    }

    #[test]
    fn relative_overrides_resolve_against_cwd() {
        let overrides = Overrides {
            db: Some(PathBuf::from("tasks.sqlite3")),
            log_level: Some("warn".to_string()),
            log_dir: Some(PathBuf::from("/var/log/taskdeck")),
        };
        let config = AppConfig::resolve_with(overrides, Path::new("/work"), None).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/work/tasks.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/taskdeck"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn missing_data_directory_requires_explicit_paths() {
        let err = AppConfig::resolve_with(Overrides::default(), Path::new("/work"), None)
            .unwrap_err();
        assert!(err.to_string().contains("--db"));
    }
}
