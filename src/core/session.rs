//! Carries the live location stack across CLI invocations of one session.
//!
//! The file holds `{"entries": {...}}`, or `{"entries": null}` once the store
//! has been discarded with `clear --force`. It is separate from snapshots.

use crate::core::error::LocstackError;
use crate::core::host::Host;
use crate::core::ident;
use crate::core::store::LocationStore;
use std::fs;
use std::path::Path;

/// `None` when no session has been started at `path`. Content that does not
/// parse, or holds malformed ids, is `CorruptSession`.
pub fn load_session(path: &Path) -> Result<Option<LocationStore>, LocstackError> {
    if !path.exists() {
        return Ok(None);
    }
    let corrupt = |reason: String| LocstackError::CorruptSession {
        path: path.display().to_string(),
        reason,
    };
    let content = fs::read_to_string(path)?;
    let store: LocationStore =
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    if let Some(entries) = store.entries() {
        if let Some(bad) = ident::find_invalid_id(entries.keys()) {
            return Err(corrupt(format!("invalid id '{}'", bad)));
        }
    }
    Ok(Some(store))
}

pub fn save_session(path: &Path, store: &LocationStore) -> Result<(), LocstackError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(store)?)?;
    Ok(())
}

/// Loads the session, or starts one (seeded with the startup directory as
/// `last` when `seed_last` is set).
pub fn open_session(
    path: &Path,
    host: &dyn Host,
    seed_last: bool,
) -> Result<LocationStore, LocstackError> {
    if let Some(store) = load_session(path)? {
        return Ok(store);
    }
    if seed_last {
        let startup = host.resolve(&host.current_dir()?)?;
        Ok(LocationStore::seeded(&startup))
    } else {
        Ok(LocationStore::new())
    }
}
