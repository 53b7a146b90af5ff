//! Named on-disk snapshots of the location stack.
//!
//! A snapshot is a JSON object mapping ids to paths. The `default` snapshot
//! lives in `locstack.json`; any other name `n` lives in `locstack_n.json`.
//! Writes are plain overwrites.

use crate::core::error::LocstackError;
use crate::core::ident::{self, DEFAULT_SNAPSHOT};
use crate::core::pattern::WildcardSet;
use crate::core::store::{Entries, LocationStore};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_STEM: &str = "locstack";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Imported {
    pub name: String,
    pub path: PathBuf,
    pub count: usize,
    pub merged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotListing {
    pub names: Vec<String>,
    pub rejected: Vec<String>,
}

pub fn snapshot_file_name(name: &str) -> String {
    if name.is_empty() || name == DEFAULT_SNAPSHOT {
        format!("{}.json", FILE_STEM)
    } else {
        format!("{}_{}.json", FILE_STEM, name)
    }
}

pub fn snapshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(snapshot_file_name(name))
}

/// Snapshot name a file in the snapshot directory stands for, if any.
pub fn name_from_file(file_name: &str) -> Option<String> {
    if file_name == format!("{}.json", FILE_STEM) {
        return Some(DEFAULT_SNAPSHOT.to_string());
    }
    let name = file_name
        .strip_prefix(FILE_STEM)?
        .strip_prefix('_')?
        .strip_suffix(".json")?;
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(name.to_string())
    } else {
        None
    }
}

pub fn export_snapshot(
    dir: &Path,
    store: &LocationStore,
    name: Option<&str>,
    force: bool,
) -> Result<PathBuf, LocstackError> {
    let name = ident::snapshot_name(name)?;
    let entries = store.entries().ok_or(LocstackError::EmptyStore)?;
    let path = snapshot_path(dir, &name);
    if path.exists() && !force {
        return Err(LocstackError::SnapshotExists(name));
    }

    fs::create_dir_all(dir)?;
    let mut body = serde_json::to_string_pretty(entries)?;
    body.push('\n');
    fs::write(&path, body)?;
    Ok(path)
}

/// Reads and validates a snapshot file. Unparseable content or malformed ids
/// are fatal.
pub fn read_snapshot(dir: &Path, name: &str) -> Result<Entries, LocstackError> {
    let path = snapshot_path(dir, name);
    if !path.exists() {
        return Err(LocstackError::SnapshotNotFound(name.to_string()));
    }
    let content = fs::read_to_string(&path)?;
    let entries: Entries =
        serde_json::from_str(&content).map_err(|e| LocstackError::CorruptSnapshot {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    if let Some(bad) = ident::find_invalid_id(entries.keys()) {
        return Err(LocstackError::CorruptSnapshot {
            name: name.to_string(),
            reason: format!("invalid id '{}'", bad),
        });
    }
    Ok(entries)
}

pub fn import_snapshot(
    dir: &Path,
    store: &mut LocationStore,
    name: Option<&str>,
    force: bool,
    merge: bool,
) -> Result<Imported, LocstackError> {
    let name = ident::snapshot_name(name)?;
    if !force {
        return Err(LocstackError::ConfirmationRequired(format!(
            "Importing snapshot '{}' replaces the current stack",
            name
        )));
    }
    let entries = read_snapshot(dir, &name)?;
    let count = if merge {
        store.merge(entries)
    } else {
        let n = entries.len();
        store.replace(entries);
        n
    };
    Ok(Imported {
        path: snapshot_path(dir, &name),
        name,
        count,
        merged: merge,
    })
}

pub fn list_snapshots(dir: &Path, patterns: &[String]) -> Result<SnapshotListing, LocstackError> {
    let default_patterns = ["*".to_string()];
    let patterns = if patterns.is_empty() {
        &default_patterns[..]
    } else {
        patterns
    };
    let filter = WildcardSet::compile(patterns, ident::is_valid_snapshot_pattern)?;

    let mut names = BTreeSet::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(name_from_file) else {
                continue;
            };
            if filter.matches_any(&name) {
                names.insert(name);
            }
        }
    }

    Ok(SnapshotListing {
        names: names.into_iter().collect(),
        rejected: filter.rejected,
    })
}

pub fn delete_snapshot(dir: &Path, name: &str, force: bool) -> Result<PathBuf, LocstackError> {
    if name.is_empty() {
        return Err(LocstackError::Usage(
            "a snapshot name is required".to_string(),
        ));
    }
    let name = ident::snapshot_name(Some(name))?;
    if !force {
        return Err(LocstackError::ConfirmationRequired(format!(
            "Deleting snapshot '{}' cannot be undone",
            name
        )));
    }
    let path = snapshot_path(dir, &name);
    if !path.exists() {
        return Err(LocstackError::SnapshotNotFound(name));
    }
    fs::remove_file(&path)?;
    Ok(path)
}
