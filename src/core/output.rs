//! Terminal and JSON rendering for command results.
//!
//! Data goes to stdout; status lines go to stderr so `goto` output can be
//! captured by a shell wrapper.

use crate::core::journal::{new_event_id, now_epoch_z};
use crate::core::store::Entries;
use clap::ValueEnum;
use colored::Colorize;
use serde_json::Value as JsonValue;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// `{envelope_version, ts, event_id, cmd, status, data}`.
pub fn envelope(cmd: &str, status: &str, data: JsonValue) -> JsonValue {
    serde_json::json!({
        "envelope_version": "1.0.0",
        "ts": now_epoch_z(),
        "event_id": new_event_id(),
        "cmd": cmd,
        "status": status,
        "data": data,
    })
}

pub fn print_envelope(cmd: &str, status: &str, data: JsonValue) {
    let env = envelope(cmd, status, data);
    println!(
        "{}",
        serde_json::to_string_pretty(&env).unwrap_or_else(|_| env.to_string())
    );
}

fn id_width(entries: &Entries) -> usize {
    entries.keys().map(|k| k.chars().count()).max().unwrap_or(0)
}

/// Two aligned columns, id then path, sorted by id.
pub fn print_entries(entries: &Entries) {
    let width = id_width(entries);
    for (id, path) in entries {
        println!(
            "  {}  {}",
            format!("{:<width$}", id, width = width).bright_cyan(),
            path.bright_white()
        );
    }
}

pub fn print_list(items: &[String]) {
    for item in items {
        println!("  • {}", item.bright_white());
    }
}

pub fn ok(message: &str) {
    eprintln!("{} {}", "✓".bright_green(), message);
}

pub fn reported(message: &str) {
    eprintln!("{} {}", "⚠".bright_yellow(), message.yellow());
}

pub fn fatal(message: &str) {
    eprintln!("{} {}", "✗".bright_red().bold(), message.red());
}

pub fn hint(message: &str) {
    eprintln!("  {}", message.bright_black());
}
