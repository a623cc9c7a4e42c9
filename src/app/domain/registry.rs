use serde::{Deserialize, Serialize};

use crate::app::services::text_ops::extract_filename;

/// One known script in the recent list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub path: String,
    pub display_name: String,
}

impl RecentEntry {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            display_name: extract_filename(path),
        }
    }
}

/// Ordered set of known files plus the one currently shown.
///
/// Entries are kept in insertion order and listed newest first. Adding a path
/// that is already known changes nothing.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: Vec<RecentEntry>,
    current: Option<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a newest-first listing, as persisted.
    pub fn from_recent(newest_first: Vec<RecentEntry>) -> Self {
        let mut registry = Self::new();
        for entry in newest_first.into_iter().rev() {
            registry.add(entry);
        }
        registry
    }

    /// Returns true if the entry was new.
    pub fn add(&mut self, entry: RecentEntry) -> bool {
        if self.contains(&entry.path) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Drop an entry. Clears `current` if it pointed at it. Returns true if found.
    pub fn remove(&mut self, path: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        if self.current.as_deref() == Some(path) {
            self.current = None;
        }
        self.entries.len() != before
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    /// Make a known path current. Unknown paths are ignored; returns whether it took.
    pub fn set_current(&mut self, path: &str) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.current = Some(path.to_string());
        true
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Newest first.
    pub fn entries(&self) -> Vec<RecentEntry> {
        self.entries.iter().rev().cloned().collect()
    }
}
