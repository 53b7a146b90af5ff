//! locstack: named directory bookmarks, a drop-in upgrade for `pushd`/`popd`.
//!
//! Give a directory a short id, jump back to it by id, toggle between the
//! last two locations, filter bookmarks with `*` wildcards, open them in a
//! file browser, and save/restore whole collections as named snapshots.
//!
//! # Architecture
//!
//! - [`core::store::LocationStore`] owns the id → path mapping and all of
//!   its policy (uniqueness, forced re-keying, the `last` slot).
//! - [`core::host::Host`] abstracts the process around the store: path
//!   resolution, current directory, `cd`, and the file browser.
//! - [`core::snapshot`] reads and writes `locstack.json` /
//!   `locstack_<name>.json` files.
//! - [`core::session`] carries the live store between invocations.
//!
//! # Examples
//!
//! ```bash
//! eval "$(locstack init bash)"     # defines `lst`, which can really cd
//! lst add proj --path ~/src/proj
//! lst goto proj
//! lst goto                         # back to where you were
//! lst list --ids 'pro*'
//! lst export --name work
//! ```

pub mod core;

use crate::core::config::Settings;
use crate::core::error::LocstackError;
use crate::core::host::{Host, SystemHost};
use crate::core::journal::{self, Journal};
use crate::core::output::{self, OutputFormat};
use crate::core::session;
use crate::core::shell::{self, Shell};
use crate::core::snapshot;
use crate::core::store::{Cleared, LocationStore, Removal};

use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;

#[derive(Parser, Debug)]
#[clap(
    name = "locstack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Named directory bookmarks with a back-and-forth toggle and snapshots"
)]
pub struct Cli {
    /// Output format.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bookmark a directory (default: the current one) under an id.
    Add {
        #[clap(value_name = "ID")]
        id: String,
        #[clap(long)]
        path: Option<String>,
        /// Overwrite the id and re-key the path if either is taken.
        #[clap(long)]
        force: bool,
    },
    /// Remove a bookmark. Without --force only shows what would go.
    Remove {
        #[clap(value_name = "ID")]
        id: String,
        #[clap(long)]
        force: bool,
    },
    /// List bookmarks, optionally filtered by id and/or path wildcards.
    #[clap(alias = "show")]
    List {
        #[clap(long = "ids", num_args = 1..)]
        ids: Vec<String>,
        #[clap(long = "paths", num_args = 1..)]
        paths: Vec<String>,
    },
    /// Jump to a bookmark or path; with no argument, return to `last`.
    #[clap(alias = "switch")]
    Goto {
        #[clap(value_name = "ID", conflicts_with = "path")]
        id: Option<String>,
        #[clap(long)]
        path: Option<String>,
    },
    /// Open bookmarks in the file browser (all of them when unfiltered).
    Open {
        #[clap(long = "ids", num_args = 1..)]
        ids: Vec<String>,
        #[clap(long = "paths", num_args = 1..)]
        paths: Vec<String>,
    },
    /// Remove every bookmark except `last`; --force discards the whole stack.
    Clear {
        #[clap(long)]
        force: bool,
    },
    /// Save the stack as a named snapshot.
    Export {
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        force: bool,
    },
    /// Replace the stack with a snapshot (requires --force).
    Import {
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        force: bool,
        /// Add the snapshot's entries to the stack instead of replacing it.
        #[clap(long)]
        merge: bool,
    },
    /// List saved snapshots.
    Snapshots {
        #[clap(long = "name-filter", num_args = 1..)]
        name_filter: Vec<String>,
    },
    /// Delete a snapshot (requires --force).
    DeleteSnapshot {
        #[clap(long)]
        name: String,
        #[clap(long)]
        force: bool,
    },
    /// Show recent journal events.
    History {
        #[clap(long, default_value_t = 20)]
        limit: usize,
    },
    /// Print the shell wrapper that makes `goto` change directory.
    Init {
        #[clap(value_enum)]
        shell: Shell,
        /// Name of the wrapper function.
        #[clap(long, default_value = "lst")]
        cmd: String,
    },
    /// Print the command schema as JSON.
    Schema,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::List { .. } => "list",
            Command::Goto { .. } => "goto",
            Command::Open { .. } => "open",
            Command::Clear { .. } => "clear",
            Command::Export { .. } => "export",
            Command::Import { .. } => "import",
            Command::Snapshots { .. } => "snapshots",
            Command::DeleteSnapshot { .. } => "delete-snapshot",
            Command::History { .. } => "history",
            Command::Init { .. } => "init",
            Command::Schema => "schema",
        }
    }
}

pub fn schema() -> JsonValue {
    serde_json::json!({
        "name": "locstack",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Named directory bookmarks with a toggle slot and snapshots",
        "commands": [
            { "name": "add", "parameters": ["id", "path", "force"] },
            { "name": "remove", "parameters": ["id", "force"] },
            { "name": "list", "aliases": ["show"], "parameters": ["ids", "paths"] },
            { "name": "goto", "aliases": ["switch"], "parameters": ["id", "path"] },
            { "name": "open", "parameters": ["ids", "paths"] },
            { "name": "clear", "parameters": ["force"] },
            { "name": "export", "parameters": ["name", "force"] },
            { "name": "import", "parameters": ["name", "force", "merge"] },
            { "name": "snapshots", "parameters": ["name-filter"] },
            { "name": "delete-snapshot", "parameters": ["name", "force"] },
            { "name": "history", "parameters": ["limit"] },
            { "name": "init", "parameters": ["shell", "cmd"] },
            { "name": "schema", "parameters": [] }
        ],
        "storage": ["session.json", "locstack.json", "locstack_<name>.json", "locstack.events.jsonl"]
    })
}

pub fn run() -> Result<(), LocstackError> {
    run_cli(Cli::parse())
}

/// Runs one parsed command. Reported failures are printed and swallowed;
/// only fatal ones come back as `Err`.
pub fn run_cli(cli: Cli) -> Result<(), LocstackError> {
    let format = cli.format;
    match &cli.command {
        Command::Init { shell, cmd } => {
            print!("{}", shell::init_script(*shell, cmd)?);
            return Ok(());
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema())?);
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::from_env()?;
    let journal = Journal::new(settings.journal_file.clone());
    let mut host = SystemHost::new(settings.browser.clone());
    let discarding = matches!(cli.command, Command::Clear { force: true });
    let (mut store, fresh) =
        match session::open_session(&settings.session_file, &host, settings.seed_last) {
            Ok(store) => (store, !settings.session_file.exists()),
            Err(LocstackError::CorruptSession { path, .. }) if discarding => {
                output::reported(&format!("Discarding unreadable session file {}", path));
                (LocationStore::new(), true)
            }
            Err(e) => return Err(e),
        };
    let before = store.clone();

    let op = cli.command.name();
    let result = execute(&cli.command, format, &settings, &mut host, &mut store);

    if fresh || store != before {
        session::save_session(&settings.session_file, &store)?;
    }

    match result {
        Ok(detail) => {
            record_event(&journal, op, "ok", detail);
            Ok(())
        }
        Err(e) => {
            let status = if e.is_fatal() { "error" } else { "reported" };
            let detail = serde_json::json!({ "kind": e.kind(), "message": e.to_string() });
            record_event(&journal, op, status, detail.clone());
            if format == OutputFormat::Json {
                output::print_envelope(op, status, detail);
            }
            if e.is_fatal() {
                return Err(e);
            }
            if format == OutputFormat::Text {
                output::reported(&e.to_string());
            }
            Ok(())
        }
    }
}

/// The journal never changes a command's outcome; a failed append is only
/// reported.
fn record_event(journal: &Journal, op: &str, status: &str, detail: JsonValue) {
    if let Err(e) = journal.record(op, status, detail) {
        output::reported(&format!("Journal not written: {}", e));
    }
}

/// Applies `command` to `store` through `host`, printing in `format`.
/// Returns the detail recorded in the journal.
pub fn execute(
    command: &Command,
    format: OutputFormat,
    settings: &Settings,
    host: &mut dyn Host,
    store: &mut LocationStore,
) -> Result<JsonValue, LocstackError> {
    let op = command.name();
    let text = format == OutputFormat::Text;
    let detail = match command {
        Command::Add { id, path, force } => {
            let added = store.add(host, id, path.as_deref(), *force)?;
            if text {
                if let Some(old) = &added.replaced {
                    output::hint(&format!("re-keyed from '{}'", old));
                }
                output::ok(&format!(
                    "Added {} → {}",
                    added.location.id, added.location.path
                ));
            }
            serde_json::json!({
                "id": added.location.id,
                "path": added.location.path,
                "replaced": added.replaced,
            })
        }
        Command::Remove { id, force } => match store.remove(id, *force)? {
            Removal::Preview(loc) => {
                if text {
                    output::reported(&format!(
                        "Would remove {} → {}; use --force to confirm",
                        loc.id, loc.path
                    ));
                }
                serde_json::json!({ "removed": false, "id": loc.id, "path": loc.path })
            }
            Removal::Removed(loc) => {
                if text {
                    output::ok(&format!("Removed {} → {}", loc.id, loc.path));
                }
                serde_json::json!({ "removed": true, "id": loc.id, "path": loc.path })
            }
        },
        Command::List { ids, paths } => {
            let selection = store.show(ids, paths)?;
            if text {
                for bad in &selection.rejected {
                    output::reported(&format!("Invalid id pattern '{}' skipped", bad));
                }
                if selection.entries.is_empty() {
                    output::hint("No matching locations");
                }
                output::print_entries(&selection.entries);
            }
            serde_json::json!({
                "entries": selection.entries,
                "rejected": selection.rejected,
            })
        }
        Command::Goto { id, path } => {
            let switched = store.switch(host, id.as_deref(), path.as_deref())?;
            if text {
                println!("{}", switched.to);
            }
            serde_json::json!({ "from": switched.from, "to": switched.to })
        }
        Command::Open { ids, paths } => {
            let opened = store.open(host, ids, paths)?;
            if text {
                for bad in &opened.rejected {
                    output::reported(&format!("Invalid id pattern '{}' skipped", bad));
                }
                for path in &opened.paths {
                    output::ok(&format!("Opened {}", path));
                }
                for (path, reason) in &opened.failed {
                    output::reported(&format!("Could not open {}: {}", path, reason));
                }
            }
            serde_json::json!({
                "opened": opened.paths,
                "failed": opened.failed,
                "rejected": opened.rejected,
            })
        }
        Command::Clear { force } => match store.clear(*force) {
            Cleared::KeptLast { removed } => {
                if text {
                    output::ok(&format!("Cleared {} location(s); kept 'last'", removed));
                }
                serde_json::json!({ "removed": removed, "discarded": false })
            }
            Cleared::Discarded => {
                if text {
                    output::ok("Discarded the location stack");
                }
                serde_json::json!({ "discarded": true })
            }
        },
        Command::Export { name, force } => {
            let path =
                snapshot::export_snapshot(&settings.snapshot_dir, store, name.as_deref(), *force)?;
            if text {
                output::ok(&format!("Exported {} location(s) to {}", store.len(), path.display()));
            }
            serde_json::json!({ "path": path, "count": store.len() })
        }
        Command::Import { name, force, merge } => {
            let imported = snapshot::import_snapshot(
                &settings.snapshot_dir,
                store,
                name.as_deref(),
                *force,
                *merge,
            )?;
            if text {
                let verb = if imported.merged { "Merged" } else { "Imported" };
                output::ok(&format!(
                    "{} {} location(s) from snapshot '{}'",
                    verb, imported.count, imported.name
                ));
            }
            serde_json::to_value(&imported)?
        }
        Command::Snapshots { name_filter } => {
            let listing = snapshot::list_snapshots(&settings.snapshot_dir, name_filter)?;
            if text {
                for bad in &listing.rejected {
                    output::reported(&format!("Invalid name pattern '{}' skipped", bad));
                }
                if listing.names.is_empty() {
                    output::hint("No snapshots");
                }
                output::print_list(&listing.names);
            }
            serde_json::to_value(&listing)?
        }
        Command::DeleteSnapshot { name, force } => {
            let path = snapshot::delete_snapshot(&settings.snapshot_dir, name, *force)?;
            if text {
                output::ok(&format!("Deleted snapshot {}", path.display()));
            }
            serde_json::json!({ "path": path })
        }
        Command::History { limit } => {
            let events = match &settings.journal_file {
                Some(path) => journal::read_events(path)?,
                None => Vec::new(),
            };
            let start = events.len().saturating_sub(*limit);
            let recent = &events[start..];
            if text {
                if settings.journal_file.is_none() {
                    output::hint("Journal is disabled in config.toml");
                }
                let lines: Vec<String> = recent
                    .iter()
                    .map(|ev| format!("{}  {:<16} {}", ev.ts, ev.op, ev.status))
                    .collect();
                output::print_list(&lines);
            }
            serde_json::json!({ "events": recent })
        }
        Command::Init { .. } | Command::Schema => JsonValue::Null,
    };

    if format == OutputFormat::Json {
        output::print_envelope(op, "ok", detail.clone());
    }
    Ok(detail)
}
