//! Seam between the location store and the process/shell it runs in.
//!
//! The store never touches the filesystem or the working directory itself;
//! it asks a [`Host`] to resolve paths, report and change the current
//! directory, and launch the file browser.

use crate::core::error::LocstackError;
use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub trait Host {
    /// Absolute, canonical, separator-trimmed form of `path`.
    fn resolve(&self, path: &str) -> Result<String, LocstackError>;
    fn current_dir(&self) -> Result<String, LocstackError>;
    fn change_dir(&mut self, path: &str) -> Result<(), LocstackError>;
    /// Fire-and-forget; callers only log failures.
    fn open_in_browser(&mut self, path: &str) -> Result<(), LocstackError>;
}

/// Strips trailing `/` or `\`, keeping a bare root (`/`, `C:\`) intact.
pub fn trim_trailing_separators(path: &str) -> String {
    let mut out = path.to_string();
    while out.len() > 1
        && (out.ends_with('/') || out.ends_with('\\'))
        && !out.ends_with(":\\")
        && !out.ends_with(":/")
    {
        out.pop();
    }
    out
}

fn path_to_string(original: &str, path: &Path) -> Result<String, LocstackError> {
    let s = path.to_str().ok_or_else(|| LocstackError::PathResolution {
        path: original.to_string(),
        reason: "path is not valid UTF-8".to_string(),
    })?;
    // canonicalize() yields verbatim paths on Windows.
    let s = s.strip_prefix(r"\\?\").unwrap_or(s);
    Ok(trim_trailing_separators(s))
}

/// The real process: std filesystem resolution and a platform browser.
///
/// `change_dir` moves this process only; the CLI prints the target so a
/// shell wrapper can follow.
#[derive(Debug, Default)]
pub struct SystemHost {
    browser: Option<String>,
}

impl SystemHost {
    pub fn new(browser: Option<String>) -> Self {
        Self { browser }
    }

    fn expand_home(path: &str) -> PathBuf {
        if path == "~" || path.starts_with("~/") || path.starts_with("~\\") {
            let home = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE"));
            if let Some(home) = home {
                let rest = path[1..].trim_start_matches(['/', '\\']);
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(path)
    }

    fn browser_command(&self) -> (String, Vec<String>) {
        if let Some(cmd) = self.browser.as_deref().filter(|c| !c.trim().is_empty()) {
            let mut parts = cmd.split_whitespace().map(|s| s.to_string());
            let program = parts.next().unwrap_or_default();
            return (program, parts.collect());
        }
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(windows) {
            "explorer"
        } else {
            "xdg-open"
        };
        (program.to_string(), Vec::new())
    }
}

impl Host for SystemHost {
    fn resolve(&self, path: &str) -> Result<String, LocstackError> {
        let expanded = Self::expand_home(path);
        let canonical =
            std::fs::canonicalize(&expanded).map_err(|e| LocstackError::PathResolution {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        path_to_string(path, &canonical)
    }

    fn current_dir(&self) -> Result<String, LocstackError> {
        let cwd = env::current_dir().map_err(LocstackError::IoError)?;
        path_to_string(&cwd.to_string_lossy(), &cwd)
    }

    fn change_dir(&mut self, path: &str) -> Result<(), LocstackError> {
        env::set_current_dir(path).map_err(|e| LocstackError::PathResolution {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn open_in_browser(&mut self, path: &str) -> Result<(), LocstackError> {
        let (program, args) = self.browser_command();
        Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(LocstackError::IoError)?;
        Ok(())
    }
}

/// In-memory host with a fixed set of existing directories.
///
/// Paths use `/` separators; relative inputs resolve against `cwd` and `.`/`..`
/// are folded lexically.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    dirs: BTreeSet<String>,
    cwd: String,
    pub opened: Vec<String>,
    pub fail_open: bool,
}

impl MemoryHost {
    pub fn new<I, S>(cwd: &str, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dirs: BTreeSet<String> = dirs
            .into_iter()
            .map(|d| trim_trailing_separators(&d.into()))
            .collect();
        let cwd = trim_trailing_separators(cwd);
        dirs.insert(cwd.clone());
        Self {
            dirs,
            cwd,
            opened: Vec::new(),
            fail_open: false,
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    fn normalize(&self, path: &str) -> String {
        let joined = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}/{}", self.cwd, path)
        };
        let mut parts: Vec<&str> = Vec::new();
        for part in joined.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                p => parts.push(p),
            }
        }
        format!("/{}", parts.join("/"))
    }
}

impl Host for MemoryHost {
    fn resolve(&self, path: &str) -> Result<String, LocstackError> {
        let normalized = self.normalize(path);
        if self.dirs.contains(&normalized) {
            Ok(normalized)
        } else {
            Err(LocstackError::PathResolution {
                path: path.to_string(),
                reason: "no such directory".to_string(),
            })
        }
    }

    fn current_dir(&self) -> Result<String, LocstackError> {
        Ok(self.cwd.clone())
    }

    fn change_dir(&mut self, path: &str) -> Result<(), LocstackError> {
        let target = self.resolve(path)?;
        self.cwd = target;
        Ok(())
    }

    fn open_in_browser(&mut self, path: &str) -> Result<(), LocstackError> {
        if self.fail_open {
            return Err(LocstackError::IoError(std::io::Error::other(
                "browser unavailable",
            )));
        }
        self.opened.push(path.to_string());
        Ok(())
    }
}
