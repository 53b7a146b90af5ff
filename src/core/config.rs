//! Settings: `<home>/config.toml` plus environment overrides.
//!
//! Home is `$LOCSTACK_HOME`, else `~/.locstack`. A missing config file means
//! defaults; a malformed one is an error.

use crate::core::error::LocstackError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "LOCSTACK_HOME";
pub const SESSION_ENV: &str = "LOCSTACK_SESSION";
pub const SNAPSHOT_DIR_ENV: &str = "LOCSTACK_SNAPSHOT_DIR";

pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE: &str = "session.json";
pub const JOURNAL_FILE: &str = "locstack.events.jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where snapshots live; relative paths are taken from home.
    pub snapshot_dir: Option<PathBuf>,
    /// Command used to open a directory, e.g. `"nautilus"` or `"code -n"`.
    pub browser: Option<String>,
    /// Append one JSONL event per command to the journal.
    pub journal: bool,
    /// Seed `last` with the startup directory when a session begins.
    pub seed_last: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: None,
            browser: None,
            journal: true,
            seed_last: true,
        }
    }
}

pub fn load_config(home: &Path) -> Result<Config, LocstackError> {
    let path = home.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| LocstackError::ConfigError(format!("{}: {}", path.display(), e)))
}

/// Fully resolved locations and options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub home: PathBuf,
    pub snapshot_dir: PathBuf,
    pub session_file: PathBuf,
    pub journal_file: Option<PathBuf>,
    pub browser: Option<String>,
    pub seed_last: bool,
}

impl Settings {
    pub fn resolve(
        home: &Path,
        config: Config,
        session_override: Option<PathBuf>,
        snapshot_override: Option<PathBuf>,
    ) -> Self {
        let snapshot_dir = snapshot_override
            .or(config.snapshot_dir)
            .map(|dir| if dir.is_absolute() { dir } else { home.join(dir) })
            .unwrap_or_else(|| home.to_path_buf());
        Self {
            home: home.to_path_buf(),
            snapshot_dir,
            session_file: session_override.unwrap_or_else(|| home.join(SESSION_FILE)),
            journal_file: config.journal.then(|| home.join(JOURNAL_FILE)),
            browser: config.browser,
            seed_last: config.seed_last,
        }
    }

    pub fn from_env() -> Result<Self, LocstackError> {
        let home = locstack_home()?;
        let config = load_config(&home)?;
        let session = env_path(SESSION_ENV);
        let snapshots = env_path(SNAPSHOT_DIR_ENV);
        Ok(Self::resolve(&home, config, session, snapshots))
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn locstack_home() -> Result<PathBuf, LocstackError> {
    if let Some(home) = env_path(HOME_ENV) {
        return Ok(home);
    }
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(|h| PathBuf::from(h).join(".locstack"))
        .ok_or_else(|| {
            LocstackError::ConfigError(format!(
                "cannot locate a home directory; set {}",
                HOME_ENV
            ))
        })
}
