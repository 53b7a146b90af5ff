//! The location stack: identifier → absolute path bookmarks.
//!
//! A store is either uninitialized (no map at all) or initialized (a map,
//! possibly empty). Every mutation validates first and then applies in one
//! step, so a rejected call never leaves a half-updated map behind.
//!
//! No two bookmarks share a path: a forced `add` re-keys the existing path
//! instead of duplicating it. The reserved id `last` is a navigation slot,
//! not a bookmark. It may alias a bookmarked path, is never evicted by a
//! re-key, and survives a non-forced `clear`.

use crate::core::error::LocstackError;
use crate::core::host::Host;
use crate::core::ident::{self, LAST};
use crate::core::pattern::WildcardSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub location: Location,
    /// Id that held the path before a forced re-key.
    pub replaced: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Nothing removed; the caller must confirm with force.
    Preview(Location),
    Removed(Location),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleared {
    KeptLast { removed: usize },
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub entries: Entries,
    /// Id patterns dropped for containing characters outside `[A-Za-z0-9_*]`.
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switched {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opened {
    pub paths: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStore {
    entries: Option<Entries>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self { entries: None }
    }

    /// A fresh store whose `last` slot points at the startup directory.
    pub fn seeded(startup_dir: &str) -> Self {
        let mut entries = Entries::new();
        entries.insert(LAST.to_string(), startup_dir.to_string());
        Self {
            entries: Some(entries),
        }
    }

    pub fn from_entries(entries: Entries) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.entries.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.as_ref().is_none_or(|e| e.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.len())
    }

    pub fn entries(&self) -> Option<&Entries> {
        self.entries.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.as_ref()?.get(id).map(|s| s.as_str())
    }

    /// Bookmark holding `path`; the `last` slot is not a bookmark.
    pub fn bookmark_for_path(&self, path: &str) -> Option<&str> {
        self.entries
            .as_ref()?
            .iter()
            .find(|(id, p)| id.as_str() != LAST && p.as_str() == path)
            .map(|(id, _)| id.as_str())
    }

    fn map_mut(&mut self) -> &mut Entries {
        self.entries.get_or_insert_with(Entries::new)
    }

    pub fn add(
        &mut self,
        host: &dyn Host,
        id: &str,
        path: Option<&str>,
        force: bool,
    ) -> Result<Added, LocstackError> {
        ident::validate_id(id)?;
        if id == LAST {
            return Err(LocstackError::ReservedIdentifier(id.to_string()));
        }
        let path = match path {
            Some(p) => host.resolve(p)?,
            None => host.resolve(&host.current_dir()?)?,
        };

        if let Some(existing) = self.get(id) {
            if !force {
                return Err(LocstackError::IdExists {
                    id: id.to_string(),
                    path: existing.to_string(),
                });
            }
        }
        let owner = self
            .bookmark_for_path(&path)
            .filter(|owner| *owner != id)
            .map(|owner| owner.to_string());
        if let Some(owner) = &owner {
            if !force {
                return Err(LocstackError::PathExists {
                    path,
                    id: owner.clone(),
                });
            }
        }

        let map = self.map_mut();
        if let Some(owner) = &owner {
            map.remove(owner);
        }
        map.insert(id.to_string(), path.clone());
        Ok(Added {
            location: Location {
                id: id.to_string(),
                path,
            },
            replaced: owner,
        })
    }

    pub fn remove(&mut self, id: &str, force: bool) -> Result<Removal, LocstackError> {
        if self.is_empty() {
            return Err(LocstackError::EmptyStore);
        }
        ident::validate_id(id)?;
        let path = self
            .get(id)
            .ok_or_else(|| LocstackError::NotFound(id.to_string()))?
            .to_string();
        let location = Location {
            id: id.to_string(),
            path,
        };
        if !force {
            return Ok(Removal::Preview(location));
        }
        self.map_mut().remove(id);
        Ok(Removal::Removed(location))
    }

    pub fn clear(&mut self, force: bool) -> Cleared {
        if force {
            self.entries = None;
            return Cleared::Discarded;
        }
        let Some(map) = self.entries.as_mut() else {
            return Cleared::KeptLast { removed: 0 };
        };
        let before = map.len();
        map.retain(|id, _| id == LAST);
        Cleared::KeptLast {
            removed: before - map.len(),
        }
    }

    /// Union of entries whose id matches an id pattern or whose path matches
    /// a path pattern. With no patterns at all, every entry is selected.
    pub fn show(
        &self,
        id_patterns: &[String],
        path_patterns: &[String],
    ) -> Result<Selection, LocstackError> {
        let Some(map) = self.entries.as_ref().filter(|m| !m.is_empty()) else {
            return Err(LocstackError::EmptyStore);
        };
        if id_patterns.is_empty() && path_patterns.is_empty() {
            return Ok(Selection {
                entries: map.clone(),
                rejected: Vec::new(),
            });
        }

        let ids = WildcardSet::compile(id_patterns, ident::is_valid_id_pattern)?;
        let paths = WildcardSet::compile(path_patterns, |_| true)?;
        let entries = map
            .iter()
            .filter(|(id, path)| ids.matches_any(id) || paths.matches_any(path))
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect();
        Ok(Selection {
            entries,
            rejected: ids.rejected,
        })
    }

    /// Moves the host to `id`, `path`, or the `last` slot, recording the
    /// directory left behind as the new `last`.
    pub fn switch(
        &mut self,
        host: &mut dyn Host,
        id: Option<&str>,
        path: Option<&str>,
    ) -> Result<Switched, LocstackError> {
        let target = match (id, path) {
            (Some(_), Some(_)) => {
                return Err(LocstackError::Usage(
                    "give either an id or a path, not both".to_string(),
                ));
            }
            (Some(id), None) => {
                ident::validate_id(id)?;
                self.get(id)
                    .ok_or_else(|| LocstackError::UnknownId(id.to_string()))?
                    .to_string()
            }
            (None, Some(path)) => host.resolve(path)?,
            (None, None) => self
                .get(LAST)
                .ok_or(LocstackError::NoLastLocation)?
                .to_string(),
        };

        let from = host.resolve(&host.current_dir()?)?;
        host.change_dir(&target)?;
        self.map_mut().insert(LAST.to_string(), from.clone());
        Ok(Switched { from, to: target })
    }

    /// Launches the browser once per distinct selected path. With no
    /// patterns every stored path is opened.
    pub fn open(
        &self,
        host: &mut dyn Host,
        id_patterns: &[String],
        path_patterns: &[String],
    ) -> Result<Opened, LocstackError> {
        let selection = self.show(id_patterns, path_patterns)?;
        let unique: BTreeSet<String> = selection.entries.into_values().collect();

        let mut opened = Opened {
            rejected: selection.rejected,
            ..Opened::default()
        };
        for path in unique {
            match host.open_in_browser(&path) {
                Ok(()) => opened.paths.push(path),
                Err(e) => opened.failed.push((path, e.to_string())),
            }
        }
        Ok(opened)
    }

    /// Swaps in `entries` wholesale.
    pub fn replace(&mut self, entries: Entries) {
        self.entries = Some(entries);
    }

    /// Applies every entry as a forced add, keeping paths unique.
    pub fn merge(&mut self, entries: Entries) -> usize {
        let map = self.map_mut();
        let mut applied = 0;
        for (id, path) in entries {
            if id != LAST {
                map.retain(|other, p| other == &id || other == LAST || p != &path);
            }
            map.insert(id, path);
            applied += 1;
        }
        applied
    }
}
