// src/watch/filter.rs

use std::path::Path;

use regex::Regex;

use crate::config::Patterns;

/// Why an event was (or was not) accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// The exclude pattern matched the full path.
    Excluded,
    /// The include pattern did not match the full path.
    NotIncluded,
}

/// Path-based event filter.
///
/// Both patterns see the full event path as reported by the watcher. Event
/// kinds are never inspected.
#[derive(Debug, Clone)]
pub struct EventFilter {
    exclude: Regex,
    include: Regex,
}

impl EventFilter {
    pub fn new(exclude: Regex, include: Regex) -> Self {
        Self { exclude, include }
    }

    pub fn from_patterns(patterns: &Patterns) -> Self {
        Self::new(patterns.exclude_file.clone(), patterns.include_file.clone())
    }

    pub fn check(&self, path: &Path) -> Verdict {
        let path = path.to_string_lossy();
        if self.exclude.is_match(&path) {
            Verdict::Excluded
        } else if !self.include.is_match(&path) {
            Verdict::NotIncluded
        } else {
            Verdict::Accept
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        self.check(path) == Verdict::Accept
    }
}
