//! Open scripts, the recent list, and which script is current.
//!
//! All methods take `&self`: state lives behind `RefCell`s whose borrows never
//! span an `.await`, so an in-flight save or read can be overlapped with edits
//! and other operations on the same thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::app::domain::registry::{RecentEntry, Registry};
use crate::app::domain::session::FileSession;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::storage::Storage;
use crate::app::services::format::format_script;
use crate::app::services::recent::RecentStore;

#[derive(Default)]
struct WorkspaceState {
    registry: Registry,
    sessions: HashMap<String, FileSession>,
    /// Bumped whenever the current session changes.
    generation: u64,
}

pub struct Workspace {
    storage: Rc<dyn Storage>,
    store: Rc<RefCell<dyn RecentStore>>,
    state: RefCell<WorkspaceState>,
}

impl Workspace {
    pub fn new(storage: Rc<dyn Storage>, store: Rc<RefCell<dyn RecentStore>>) -> Self {
        let registry = Registry::from_recent(store.borrow().list_recent());
        Self {
            storage,
            store,
            state: RefCell::new(WorkspaceState {
                registry,
                ..Default::default()
            }),
        }
    }

    pub fn storage(&self) -> Rc<dyn Storage> {
        self.storage.clone()
    }

    /// Reopen the file that was current when the app last ran.
    pub async fn restore(&self) -> Result<Option<FileSession>> {
        let last = self.store.borrow().last_active();
        let Some(path) = last else {
            return Ok(None);
        };
        if !self.state.borrow().registry.contains(&path) {
            return Ok(None);
        }
        self.select(&path).await.map(Some)
    }

    /// Read `path` from storage and make it current.
    ///
    /// A session that is already loaded with unsaved edits is reused as is so
    /// that opening a file twice never discards work.
    pub async fn open(&self, path: &str) -> Result<FileSession> {
        if self.with_session(path, |s| s.is_dirty() || s.save_in_flight()) == Some(true) {
            log::info!("{} has unsaved edits; reusing the open session", path);
            return self.make_current(path);
        }

        let content = self.storage.read(path).await?;
        {
            let mut state = self.state.borrow_mut();
            match state.sessions.get_mut(path) {
                // edited while the read was pending
                Some(session) if session.is_dirty() || session.save_in_flight() => {}
                Some(session) => {
                    if session.baseline() != content {
                        session.reset(content);
                    }
                }
                None => {
                    state
                        .sessions
                        .insert(path.to_string(), FileSession::loaded(path, content));
                }
            }
        }
        log::debug!("Opened {}", path);
        self.make_current(path)
    }

    /// Switch to a known file, loading it if it was not opened this run.
    pub async fn select(&self, path: &str) -> Result<FileSession> {
        let (known, loaded) = {
            let state = self.state.borrow();
            (state.registry.contains(path), state.sessions.contains_key(path))
        };
        if !known {
            return Err(AppError::UnknownFile(path.to_string()));
        }
        if loaded {
            self.make_current(path)
        } else {
            self.open(path).await
        }
    }

    /// Forget a file. The file on disk is left alone.
    pub fn remove(&self, path: &str) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let was_current = state.registry.current() == Some(path);
            if !state.registry.remove(path) {
                log::debug!("remove: {} was not in the registry", path);
            }
            state.sessions.remove(path);
            if was_current {
                state.generation += 1;
            }
        }
        self.store.borrow_mut().remove_recent(path)
    }

    /// Replace the current working copy.
    pub fn edit(&self, content: String) -> Result<FileSession> {
        self.with_current_mut(|session| {
            session.edit(content);
            session.clone()
        })
    }

    /// Re-indent the current working copy. Returns whether anything changed.
    pub fn format_current(&self) -> Result<bool> {
        self.with_current_mut(|session| {
            let formatted = format_script(session.working());
            if formatted == session.working() {
                return false;
            }
            session.edit(formatted);
            true
        })
    }

    /// Save the current file.
    pub async fn save(&self) -> Result<()> {
        let path = self.current_path().ok_or(AppError::NoActiveSession)?;
        self.save_path(&path).await
    }

    /// Write a session's working copy. A second save of the same file while
    /// one is pending fails with `Busy`.
    pub async fn save_path(&self, path: &str) -> Result<()> {
        let text = {
            let mut state = self.state.borrow_mut();
            let session = state
                .sessions
                .get_mut(path)
                .ok_or_else(|| AppError::UnknownFile(path.to_string()))?;
            if !session.begin_save() {
                return Err(AppError::Busy(path.to_string()));
            }
            session.working().to_string()
        };

        let result = self.storage.write(path, &text).await;

        let mut state = self.state.borrow_mut();
        let session = state.sessions.get_mut(path);
        match result {
            Ok(()) => {
                if let Some(session) = session {
                    session.finish_save(Some(text));
                }
                log::info!("Saved {}", path);
                Ok(())
            }
            Err(e) => {
                if let Some(session) = session {
                    session.finish_save(None);
                }
                log::warn!("Failed to save {}: {}", path, e);
                Err(e)
            }
        }
    }

    pub fn current_path(&self) -> Option<String> {
        self.state.borrow().registry.current().map(|p| p.to_string())
    }

    pub fn current(&self) -> Option<FileSession> {
        let state = self.state.borrow();
        let path = state.registry.current()?;
        state.sessions.get(path).cloned()
    }

    pub fn session(&self, path: &str) -> Option<FileSession> {
        self.state.borrow().sessions.get(path).cloned()
    }

    /// Newest first.
    pub fn entries(&self) -> Vec<RecentEntry> {
        self.state.borrow().registry.entries()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn with_session<R>(&self, path: &str, f: impl FnOnce(&FileSession) -> R) -> Option<R> {
        self.state.borrow().sessions.get(path).map(f)
    }

    pub(crate) fn with_session_mut<R>(&self, path: &str, f: impl FnOnce(&mut FileSession) -> R) -> Option<R> {
        self.state.borrow_mut().sessions.get_mut(path).map(f)
    }

    fn with_current_mut<R>(&self, f: impl FnOnce(&mut FileSession) -> R) -> Result<R> {
        let mut state = self.state.borrow_mut();
        let path = state
            .registry
            .current()
            .map(|p| p.to_string())
            .ok_or(AppError::NoActiveSession)?;
        state
            .sessions
            .get_mut(&path)
            .map(f)
            .ok_or(AppError::NoActiveSession)
    }

    /// Register `path` if needed and make it current. The session must be loaded.
    fn make_current(&self, path: &str) -> Result<FileSession> {
        let (session, added) = {
            let mut state = self.state.borrow_mut();
            let added = state.registry.add(RecentEntry::new(path));
            if state.registry.current() != Some(path) {
                state.registry.set_current(path);
                state.generation += 1;
            }
            let session = state
                .sessions
                .get(path)
                .cloned()
                .ok_or_else(|| AppError::UnknownFile(path.to_string()))?;
            (session, added)
        };

        // The recent list is a convenience; failing to persist it must not fail the open.
        let mut store = self.store.borrow_mut();
        if added {
            if let Err(e) = store.add_recent(RecentEntry::new(path)) {
                log::warn!("Failed to remember {}: {}", path, e);
            }
        }
        if let Err(e) = store.set_last_active(Some(path)) {
            log::warn!("Failed to store active file: {}", e);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::settings::AppSettings;
    use crate::app::infrastructure::storage::MemoryStorage;
    use crate::app::services::recent::SettingsStore;

    fn setup() -> (Rc<MemoryStorage>, Rc<RefCell<SettingsStore>>, Workspace) {
        let storage = Rc::new(MemoryStorage::new());
        let store = Rc::new(RefCell::new(SettingsStore::in_memory(AppSettings::default())));
        let workspace = Workspace::new(storage.clone(), store.clone());
        (storage, store, workspace)
    }

    #[tokio::test]
    async fn test_open_loads_clean_session() {
        let (storage, store, workspace) = setup();
        storage.insert("a.sh", "echo hi");

        let session = workspace.open("a.sh").await.unwrap();
        assert_eq!(session.working(), "echo hi");
        assert_eq!(session.baseline(), "echo hi");
        assert!(!session.is_dirty());
        assert_eq!(workspace.current_path().as_deref(), Some("a.sh"));
        assert_eq!(store.borrow().last_active().as_deref(), Some("a.sh"));
        assert_eq!(store.borrow().list_recent(), vec![RecentEntry::new("a.sh")]);
    }

    #[tokio::test]
    async fn test_open_unreadable_is_io_error() {
        let (_storage, _store, workspace) = setup();
        let err = workspace.open("missing.sh").await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(workspace.entries().is_empty());
        assert!(workspace.current().is_none());
    }

    #[tokio::test]
    async fn test_reopen_keeps_unsaved_edits() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "v1");
        workspace.open("a.sh").await.unwrap();
        workspace.edit("mine".to_string()).unwrap();
        storage.insert("a.sh", "v2");

        let session = workspace.open("a.sh").await.unwrap();
        assert_eq!(session.working(), "mine");
        assert_eq!(session.baseline(), "v1");
    }

    #[tokio::test]
    async fn test_reopen_clean_session_refreshes() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "v1");
        workspace.open("a.sh").await.unwrap();
        storage.insert("a.sh", "v2");

        let session = workspace.open("a.sh").await.unwrap();
        assert_eq!(session.working(), "v2");
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_select_reuses_loaded_content() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "a");
        storage.insert("b.sh", "b");
        workspace.open("a.sh").await.unwrap();
        workspace.edit("a edited".to_string()).unwrap();
        workspace.open("b.sh").await.unwrap();

        storage.insert("a.sh", "changed on disk");
        let session = workspace.select("a.sh").await.unwrap();
        assert_eq!(session.working(), "a edited");
        assert_eq!(session.baseline(), "a");
    }

    #[tokio::test]
    async fn test_select_known_but_unloaded_opens() {
        let storage = Rc::new(MemoryStorage::new());
        storage.insert("old.sh", "from last run");
        let store = Rc::new(RefCell::new(SettingsStore::in_memory(AppSettings {
            recent_files: vec![RecentEntry::new("old.sh")],
            active_file: Some("old.sh".to_string()),
            ..Default::default()
        })));
        let workspace = Workspace::new(storage, store);
        assert!(workspace.current().is_none());

        let restored = workspace.restore().await.unwrap().unwrap();
        assert_eq!(restored.working(), "from last run");
        assert_eq!(workspace.current_path().as_deref(), Some("old.sh"));
    }

    #[tokio::test]
    async fn test_select_unknown_fails() {
        let (_storage, _store, workspace) = setup();
        let err = workspace.select("nope.sh").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownFile(_)));
    }

    #[tokio::test]
    async fn test_remove_current() {
        let (storage, store, workspace) = setup();
        storage.insert("a.sh", "a");
        workspace.open("a.sh").await.unwrap();
        let generation = workspace.generation();

        workspace.remove("a.sh").unwrap();
        assert!(workspace.current().is_none());
        assert!(workspace.entries().is_empty());
        assert!(workspace.generation() > generation);
        assert_eq!(store.borrow().last_active(), None);
        // the file itself is untouched
        assert_eq!(storage.contents("a.sh").as_deref(), Some("a"));
        // removing again is harmless
        workspace.remove("a.sh").unwrap();
    }

    #[tokio::test]
    async fn test_edit_without_session() {
        let (_storage, _store, workspace) = setup();
        assert!(matches!(
            workspace.edit("x".to_string()).unwrap_err(),
            AppError::NoActiveSession
        ));
        assert!(matches!(workspace.save().await.unwrap_err(), AppError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_save_rebases_baseline() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "old");
        workspace.open("a.sh").await.unwrap();
        workspace.edit("new".to_string()).unwrap();

        workspace.save().await.unwrap();
        let session = workspace.current().unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.baseline(), "new");
        assert_eq!(storage.contents("a.sh").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_session_dirty() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "old");
        workspace.open("a.sh").await.unwrap();
        workspace.edit("new".to_string()).unwrap();
        storage.set_fail_writes(true);

        let err = workspace.save().await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        let session = workspace.current().unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.working(), "new");
        assert!(!session.save_in_flight());
    }

    #[tokio::test]
    async fn test_overlapping_saves_second_is_busy() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "old");
        workspace.open("a.sh").await.unwrap();
        workspace.edit("new".to_string()).unwrap();

        let (first, second) = tokio::join!(workspace.save(), workspace.save());
        assert!(first.is_ok());
        assert!(matches!(second.unwrap_err(), AppError::Busy(_)));
        assert_eq!(storage.write_count(), 1);
        assert!(!workspace.current().unwrap().is_dirty());
    }

    #[tokio::test]
    async fn test_edit_during_save_stays_dirty() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "old");
        workspace.open("a.sh").await.unwrap();
        workspace.edit("first".to_string()).unwrap();

        let edit_later = async {
            tokio::task::yield_now().await;
            workspace.edit("second".to_string()).unwrap();
        };
        let (saved, ()) = tokio::join!(workspace.save(), edit_later);
        saved.unwrap();

        let session = workspace.current().unwrap();
        assert_eq!(storage.contents("a.sh").as_deref(), Some("first"));
        assert_eq!(session.baseline(), "first");
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_format_current() {
        let (storage, _store, workspace) = setup();
        storage.insert("a.sh", "if true\necho hi\nfi");
        workspace.open("a.sh").await.unwrap();

        assert!(workspace.format_current().unwrap());
        let session = workspace.current().unwrap();
        assert_eq!(session.working(), "if true\n    echo hi\nfi");
        assert!(session.is_dirty());
        assert!(!workspace.format_current().unwrap());
    }
}
