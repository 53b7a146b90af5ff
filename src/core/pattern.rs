//! Glob-style `*` matching used by list, open and snapshot listing.
//!
//! Only `*` is special; every other character matches itself. Matching is
//! case-sensitive and anchored at both ends.

use crate::core::error::LocstackError;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct Wildcard {
    re: Regex,
}

impl Wildcard {
    pub fn new(pattern: &str) -> Result<Self, LocstackError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let re = Regex::new(&format!("^{}$", body))
            .map_err(|e| LocstackError::Usage(format!("bad pattern '{}': {}", pattern, e)))?;
        Ok(Self { re })
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.re.is_match(candidate)
    }
}

/// A compiled list of patterns plus the ones rejected by `accept`.
#[derive(Debug, Default)]
pub struct WildcardSet {
    patterns: Vec<Wildcard>,
    pub rejected: Vec<String>,
}

impl WildcardSet {
    /// Compiles every pattern that passes `accept`; the rest land in `rejected`.
    pub fn compile<F>(patterns: &[String], accept: F) -> Result<Self, LocstackError>
    where
        F: Fn(&str) -> bool,
    {
        let mut set = WildcardSet::default();
        for p in patterns {
            if accept(p) {
                set.patterns.push(Wildcard::new(p)?);
            } else {
                set.rejected.push(p.clone());
            }
        }
        Ok(set)
    }

    pub fn matches_any(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(candidate))
    }
}
