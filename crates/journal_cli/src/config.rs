//! Runtime configuration for the journal CLI.
//!
//! # Responsibility
//! - Resolve database and log locations from flags, environment and the
//!   per-user application-data directory.
//!
//! # Invariants
//! - Explicit paths always win over platform defaults.
//! - The database parent directory exists after `prepare_dirs`.

use journal_core::JOURNAL_DB_FILE_NAME;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "bullet-journal";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// No home directory, so no default data location.
    NoDataDir,
    CreateDir { path: PathBuf, source: std::io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine the application data directory; pass --db and --log-dir"
            ),
            Self::CreateDir { path, source } => {
                write!(f, "failed to create `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::CreateDir { source, .. } => Some(source),
        }
    }
}

/// Resolved locations and log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Fills unset locations from the platform data directory.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self, ConfigError> {
        let log_level =
            log_level.unwrap_or_else(|| journal_core::default_log_level().to_string());
        match (db_path, log_dir) {
            (Some(db_path), Some(log_dir)) => Ok(Self {
                db_path,
                log_dir,
                log_level,
            }),
            (db_path, log_dir) => {
                let app_dir = default_app_dir().ok_or(ConfigError::NoDataDir)?;
                Ok(Self::with_app_dir(&app_dir, db_path, log_dir, log_level))
            }
        }
    }

    fn with_app_dir(
        app_dir: &Path,
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: String,
    ) -> Self {
        Self {
            db_path: db_path.unwrap_or_else(|| app_dir.join(JOURNAL_DB_FILE_NAME)),
            log_dir: log_dir.unwrap_or_else(|| app_dir.join(LOG_DIR_NAME)),
            log_level,
        }
    }

    /// Creates the database parent directory when missing.
    pub fn prepare_dirs(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

fn default_app_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.data_dir().join(APP_DIR_NAME))
}
