//! Core runtime configuration.
//!
//! Values come from explicit construction or from `MEMO_*` environment
//! variables. Blank variables are treated as unset.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MEMO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "MEMO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "MEMO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "memo.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `MEMO_LOG_DIR` must be absolute.
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_ENV} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let log_level = read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = match read(LOG_DIR_ENV).map(PathBuf::from) {
            Some(dir) if !dir.is_absolute() => return Err(ConfigError::RelativeLogDir(dir)),
            other => other,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// Default database location inside the platform temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{default_db_path, ConfigError, CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, default_db_path());
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = CoreConfig::from_lookup(lookup(&[(DB_PATH_ENV, "  ")])).unwrap();
        assert_eq!(config.db_path, default_db_path());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let dir = std::env::temp_dir().join("memo-logs");
        let dir_str = dir.to_str().unwrap();
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "/data/notes.db"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, dir_str),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(dir));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(LOG_DIR_ENV, "logs")])).unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs")));
    }
}
