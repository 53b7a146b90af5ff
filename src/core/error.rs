use std::io;
use thiserror::Error;

/// How a failure affects the session.
///
/// `Fatal` aborts the command with a non-zero exit. `Reported` skips the
/// mutation, surfaces a message, and leaves the session usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Reported,
}

#[derive(Error, Debug)]
pub enum LocstackError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Invalid identifier '{0}': only letters, digits and '_' are allowed")]
    InvalidIdentifier(String),
    #[error("Identifier '{0}' is reserved for the previous location")]
    ReservedIdentifier(String),
    #[error("Invalid snapshot name '{0}': only letters and digits are allowed")]
    InvalidSnapshotName(String),
    #[error("Usage error: {0}")]
    Usage(String),
    #[error("Unknown id '{0}'")]
    UnknownId(String),
    #[error("Cannot resolve path '{path}': {reason}")]
    PathResolution { path: String, reason: String },
    #[error("Snapshot '{name}' is unreadable: {reason}")]
    CorruptSnapshot { name: String, reason: String },
    #[error("Session file {path} is unreadable: {reason}; run `clear --force` to reset it")]
    CorruptSession { path: String, reason: String },

    #[error("Id '{id}' already exists ({path}); use --force to overwrite")]
    IdExists { id: String, path: String },
    #[error("Path {path} already exists under id '{id}'; use --force to re-key it")]
    PathExists { path: String, id: String },
    #[error("Location stack is empty")]
    EmptyStore,
    #[error("Id '{0}' not found")]
    NotFound(String),
    #[error("No previous location recorded")]
    NoLastLocation,
    #[error("{0}; use --force to confirm")]
    ConfirmationRequired(String),
    #[error("Snapshot '{0}' already exists; use --force to overwrite")]
    SnapshotExists(String),
    #[error("Snapshot '{0}' not found")]
    SnapshotNotFound(String),
}

impl LocstackError {
    pub fn severity(&self) -> Severity {
        match self {
            LocstackError::IdExists { .. }
            | LocstackError::PathExists { .. }
            | LocstackError::EmptyStore
            | LocstackError::NotFound(_)
            | LocstackError::NoLastLocation
            | LocstackError::ConfirmationRequired(_)
            | LocstackError::SnapshotExists(_)
            | LocstackError::SnapshotNotFound(_) => Severity::Reported,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Short machine-readable tag used in JSON envelopes and the journal.
    pub fn kind(&self) -> &'static str {
        match self {
            LocstackError::IoError(_) => "io",
            LocstackError::JsonError(_) => "json",
            LocstackError::ConfigError(_) => "config",
            LocstackError::InvalidIdentifier(_) => "invalid_identifier",
            LocstackError::ReservedIdentifier(_) => "reserved_identifier",
            LocstackError::InvalidSnapshotName(_) => "invalid_snapshot_name",
            LocstackError::Usage(_) => "usage",
            LocstackError::UnknownId(_) => "unknown_id",
            LocstackError::PathResolution { .. } => "path_resolution",
            LocstackError::CorruptSnapshot { .. } => "corrupt_snapshot",
            LocstackError::CorruptSession { .. } => "corrupt_session",
            LocstackError::IdExists { .. } => "id_exists",
            LocstackError::PathExists { .. } => "path_exists",
            LocstackError::EmptyStore => "empty_store",
            LocstackError::NotFound(_) => "not_found",
            LocstackError::NoLastLocation => "no_last_location",
            LocstackError::ConfirmationRequired(_) => "confirmation_required",
            LocstackError::SnapshotExists(_) => "snapshot_exists",
            LocstackError::SnapshotNotFound(_) => "snapshot_not_found",
        }
    }
}
