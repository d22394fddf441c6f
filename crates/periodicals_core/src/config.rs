//! Store configuration resolved from defaults and environment.
//!
//! # Invariants
//! - An empty or whitespace-only override is treated as unset.
//! - Invalid numeric overrides are rejected, never silently defaulted.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// Default database file name, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "articles.db";
/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "PERIODICALS_DB_PATH";
/// Environment variable overriding the SQLite busy timeout (milliseconds).
pub const BUSY_TIMEOUT_ENV: &str = "PERIODICALS_BUSY_TIMEOUT_MS";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection settings for a file-backed store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBusyTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBusyTimeout(value) => write!(
                f,
                "invalid {BUSY_TIMEOUT_ENV} value `{value}`; expected milliseconds as an unsigned integer"
            ),
        }
    }
}

impl Error for ConfigError {}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl StoreConfig {
    /// Config pointing at `path` with default timeouts.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Resolves config from process environment over defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.path = PathBuf::from(trimmed);
            }
        }

        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let millis = trimmed
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidBusyTimeout(trimmed.to_string()))?;
                config.busy_timeout = Duration::from_millis(millis);
            }
        }

        Ok(config)
    }
}
