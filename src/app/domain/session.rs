use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::services::text_ops::extract_filename;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// The live record of one open script.
///
/// `baseline` is what we believe is on disk, `working` is what the user is
/// editing. Dirtiness is always derived from the two, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSession {
    /// Unique per load. A path that is removed and reopened gets a new id.
    id: u64,
    path: String,
    display_name: String,
    baseline: String,
    working: String,
    save_in_flight: bool,
    /// Bumped every time `baseline` is replaced. Async work that started
    /// against an older revision must not apply its result.
    revision: u64,
}

impl FileSession {
    /// A freshly loaded session: working == baseline == content.
    pub fn loaded(path: &str, content: String) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            path: path.to_string(),
            display_name: extract_filename(path),
            working: content.clone(),
            baseline: content,
            save_in_flight: false,
            revision: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn working(&self) -> &str {
        &self.working
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the working copy. No disk I/O.
    pub fn edit(&mut self, content: String) {
        self.working = content;
    }

    /// Replace both copies, e.g. after a re-read or an accepted external change.
    pub fn reset(&mut self, content: String) {
        self.working = content.clone();
        self.set_baseline(content);
    }

    /// Move the baseline without touching the working copy.
    pub fn set_baseline(&mut self, content: String) {
        self.baseline = content;
        self.revision += 1;
    }

    /// Claim the single save slot. Returns false if a save is already running.
    pub fn begin_save(&mut self) -> bool {
        if self.save_in_flight {
            return false;
        }
        self.save_in_flight = true;
        true
    }

    /// Release the save slot. On success the baseline becomes exactly the text
    /// that was written, so edits made while the write was pending stay dirty.
    pub fn finish_save(&mut self, written: Option<String>) {
        self.save_in_flight = false;
        if let Some(text) = written {
            self.set_baseline(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_session_is_clean() {
        let session = FileSession::loaded("/tmp/scripts/run.sh", "echo hi".to_string());
        assert_eq!(session.display_name(), "run.sh");
        assert_eq!(session.working(), session.baseline());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_each_load_gets_a_new_id() {
        let first = FileSession::loaded("a.sh", "x".to_string());
        let second = FileSession::loaded("a.sh", "x".to_string());
        assert_ne!(first.id(), second.id());
        assert_eq!(first.clone().id(), first.id());
    }

    #[test]
    fn test_dirty_tracks_every_edit() {
        let mut session = FileSession::loaded("a.sh", "x".to_string());
        for (content, dirty) in [("xy", true), ("x", false), ("", true), ("x", false)] {
            session.edit(content.to_string());
            assert_eq!(session.is_dirty(), dirty, "after edit to {:?}", content);
            assert_eq!(session.is_dirty(), session.working() != session.baseline());
        }
    }

    #[test]
    fn test_set_baseline_rederives_dirty() {
        let mut session = FileSession::loaded("a.sh", "old".to_string());
        session.edit("new".to_string());
        assert!(session.is_dirty());

        session.set_baseline("new".to_string());
        assert!(!session.is_dirty());
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_save_slot() {
        let mut session = FileSession::loaded("a.sh", "a".to_string());
        session.edit("b".to_string());
        assert!(session.begin_save());
        assert!(!session.begin_save());

        session.finish_save(Some("b".to_string()));
        assert!(!session.save_in_flight());
        assert!(!session.is_dirty());
        assert!(session.begin_save());
    }

    #[test]
    fn test_failed_save_keeps_session() {
        let mut session = FileSession::loaded("a.sh", "a".to_string());
        session.edit("b".to_string());
        assert!(session.begin_save());
        session.finish_save(None);
        assert!(session.is_dirty());
        assert_eq!(session.baseline(), "a");
        assert_eq!(session.revision(), 0);
    }
}
