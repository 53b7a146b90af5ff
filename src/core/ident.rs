//! Character-class rules for identifiers, id patterns and snapshot names.

use crate::core::error::LocstackError;
use regex::Regex;
use std::sync::LazyLock;

/// Reserved id holding the directory visited before the latest navigation.
pub const LAST: &str = "last";

/// Snapshot name used when none is given.
pub const DEFAULT_SNAPSHOT: &str = "default";

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_*]+$").unwrap());
static SNAPSHOT_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]*$").unwrap());
static SNAPSHOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9*]*$").unwrap());

pub fn is_valid_id(id: &str) -> bool {
    IDENTIFIER.is_match(id)
}

pub fn validate_id(id: &str) -> Result<(), LocstackError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(LocstackError::InvalidIdentifier(id.to_string()))
    }
}

/// First stored id that is neither `last` nor a valid identifier.
pub fn find_invalid_id<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    ids.into_iter()
        .map(String::as_str)
        .find(|id| *id != LAST && !is_valid_id(id))
}

pub fn is_valid_id_pattern(pattern: &str) -> bool {
    ID_PATTERN.is_match(pattern)
}

pub fn is_valid_snapshot_pattern(pattern: &str) -> bool {
    SNAPSHOT_PATTERN.is_match(pattern)
}

/// Validates a snapshot name and maps the empty name to `default`.
pub fn snapshot_name(name: Option<&str>) -> Result<String, LocstackError> {
    let name = name.unwrap_or("");
    if !SNAPSHOT_NAME.is_match(name) {
        return Err(LocstackError::InvalidSnapshotName(name.to_string()));
    }
    if name.is_empty() {
        Ok(DEFAULT_SNAPSHOT.to_string())
    } else {
        Ok(name.to_string())
    }
}
