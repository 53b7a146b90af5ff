//! Append-only JSONL journal of executed commands.
//!
//! One line per command: when it ran, a ULID, the operation, how it ended
//! (`ok`, `reported`, `error`) and a free-form detail object.

use crate::core::error::LocstackError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEvent {
    pub ts: String,
    pub event_id: String,
    pub op: String,
    pub status: String,
    pub detail: JsonValue,
}

/// Unix-epoch seconds with a `Z` suffix, e.g. `1771220592Z`.
pub fn now_epoch_z() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

pub fn new_event_id() -> String {
    Ulid::new().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct Journal {
    path: Option<PathBuf>,
}

impl Journal {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn record(&self, op: &str, status: &str, detail: JsonValue) -> Result<(), LocstackError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let ev = JournalEvent {
            ts: now_epoch_z(),
            event_id: new_event_id(),
            op: op.to_string(),
            status: status.to_string(),
            detail,
        };
        let mut f = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(f, "{}", serde_json::to_string(&ev)?)?;
        Ok(())
    }
}

/// Reads every event; lines that fail to parse are skipped.
pub fn read_events(path: &Path) -> Result<Vec<JournalEvent>, LocstackError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(fs::File::open(path)?);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Ok(ev) = serde_json::from_str::<JournalEvent>(&line) {
            out.push(ev);
        }
    }
    Ok(out)
}
