use similar::TextDiff;

/// How the user settled an external change that collided with unsaved edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Accept the disk text as the new baseline but keep the working copy.
    KeepMine,
    /// Throw away unsaved edits and take the disk text.
    ReloadTheirs,
}

/// An unresolved external change. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRecord {
    pub path: String,
    /// Id of the session the record was raised against.
    pub session_id: u64,
    /// What was read from disk when the collision was detected.
    pub disk_content: String,
    /// Session revision the record was raised against.
    pub revision: u64,
}

impl ConflictRecord {
    /// Unified diff from the user's working copy to the disk text.
    pub fn diff_against(&self, working: &str) -> String {
        TextDiff::from_lines(working, &self.disk_content)
            .unified_diff()
            .context_radius(2)
            .header("yours", "on disk")
            .to_string()
    }
}
