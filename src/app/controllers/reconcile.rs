//! Keeps the current session honest about what is on disk.
//!
//! Timer ticks and focus changes both funnel into [`Reconciler::check`], which
//! holds a single-slot guard: while a read is in flight, a conflict is waiting
//! for the user, or a save is running, further checks are skipped.
//!
//! ```text
//!            disk == baseline ──────────────► Unchanged
//!  check ──► clean session ──────────────────► Adopted (baseline = working = disk)
//!            dirty session ──► ConflictRecord ──► KeepMine     (baseline = disk)
//!                                             └─► ReloadTheirs (baseline = working = disk)
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::workspace::Workspace;
use crate::app::domain::conflict::{ConflictRecord, Resolution};
use crate::app::domain::session::FileSession;
use crate::app::infrastructure::error::{AppError, Result};

/// What asked for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Tick,
    FocusRegained,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSession,
    ConflictPending,
    SaveInFlight,
    CheckInFlight,
    ShutDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Skipped(SkipReason),
    /// Disk matches the baseline.
    Unchanged,
    /// Disk changed and there were no local edits; the new text was taken.
    Adopted(String),
    /// Disk changed under unsaved edits. The user has to pick a side.
    Conflict(ConflictRecord),
    /// The read failed; it will be retried on the next trigger.
    ReadFailed,
    /// The world moved on while reading (session switched, saved, or shut down).
    Discarded,
}

#[derive(Debug, Default)]
struct ReconcileState {
    conflict: Option<ConflictRecord>,
    reading: Option<String>,
    shut_down: bool,
}

/// Clears the in-flight marker even if the check future is dropped mid-read.
struct ReadSlot<'a> {
    state: &'a RefCell<ReconcileState>,
}

impl Drop for ReadSlot<'_> {
    fn drop(&mut self) {
        self.state.borrow_mut().reading = None;
    }
}

pub struct Reconciler {
    workspace: Rc<Workspace>,
    state: RefCell<ReconcileState>,
}

impl Reconciler {
    pub fn new(workspace: Rc<Workspace>) -> Self {
        Self {
            workspace,
            state: RefCell::new(ReconcileState::default()),
        }
    }

    /// Compare the current session with disk and act on the difference.
    pub async fn check(&self, trigger: Trigger) -> CheckOutcome {
        let (path, generation, revision) = match self.claim() {
            Ok(claimed) => claimed,
            Err(reason) => {
                log::trace!("Skipping {:?} check: {:?}", trigger, reason);
                return CheckOutcome::Skipped(reason);
            }
        };
        let slot = ReadSlot { state: &self.state };

        log::debug!("Checking {} for external changes ({:?})", path, trigger);
        let read = self.workspace.storage().read(&path).await;
        drop(slot);

        match read {
            Ok(disk) => self.apply(&path, generation, revision, disk),
            Err(e) => {
                log::warn!("Could not re-read {}: {}", path, e);
                CheckOutcome::ReadFailed
            }
        }
    }

    /// Take the read slot, or say why not.
    fn claim(&self) -> std::result::Result<(String, u64, u64), SkipReason> {
        let mut state = self.state.borrow_mut();
        if state.shut_down {
            return Err(SkipReason::ShutDown);
        }
        if let Some(conflict) = &state.conflict {
            if self.record_applies(conflict) {
                return Err(SkipReason::ConflictPending);
            }
            log::debug!("Dropping conflict for closed file {}", conflict.path);
            state.conflict = None;
        }
        if state.reading.is_some() {
            return Err(SkipReason::CheckInFlight);
        }

        let path = self.workspace.current_path().ok_or(SkipReason::NoSession)?;
        let (saving, revision) = self
            .workspace
            .with_session(&path, |s| (s.save_in_flight(), s.revision()))
            .ok_or(SkipReason::NoSession)?;
        if saving {
            return Err(SkipReason::SaveInFlight);
        }

        state.reading = Some(path.clone());
        Ok((path, self.workspace.generation(), revision))
    }

    fn apply(&self, path: &str, generation: u64, revision: u64, disk: String) -> CheckOutcome {
        if self.state.borrow().shut_down || self.workspace.generation() != generation {
            log::debug!("Discarding stale read of {}", path);
            return CheckOutcome::Discarded;
        }

        let outcome = self.workspace.with_session_mut(path, |session| {
            if session.revision() != revision || session.save_in_flight() {
                return CheckOutcome::Discarded;
            }
            if disk == session.baseline() {
                return CheckOutcome::Unchanged;
            }
            if !session.is_dirty() {
                session.reset(disk);
                return CheckOutcome::Adopted(path.to_string());
            }
            CheckOutcome::Conflict(ConflictRecord {
                path: path.to_string(),
                session_id: session.id(),
                disk_content: disk,
                revision: session.revision(),
            })
        });

        match outcome {
            Some(CheckOutcome::Conflict(record)) => {
                log::info!("{} changed on disk while it has unsaved edits", path);
                self.state.borrow_mut().conflict = Some(record.clone());
                CheckOutcome::Conflict(record)
            }
            Some(CheckOutcome::Adopted(path)) => {
                log::info!("Reloaded {} after an external change", path);
                CheckOutcome::Adopted(path)
            }
            Some(other) => other,
            None => CheckOutcome::Discarded,
        }
    }

    /// Whether the session the record was raised against is still loaded.
    fn record_applies(&self, record: &ConflictRecord) -> bool {
        self.workspace.with_session(&record.path, |s| s.id()) == Some(record.session_id)
    }

    pub fn pending_conflict(&self) -> Option<ConflictRecord> {
        self.state.borrow().conflict.clone()
    }

    /// Close the pending conflict. Returns the updated session, or `None` if
    /// the record no longer applied (file closed, reopened or saved since) and was
    /// dropped without changes.
    pub fn resolve(&self, resolution: Resolution) -> Result<Option<FileSession>> {
        let record = self
            .state
            .borrow_mut()
            .conflict
            .take()
            .ok_or(AppError::NoConflict)?;

        let applied = self.workspace.with_session_mut(&record.path, |session| {
            if session.id() != record.session_id || session.revision() != record.revision {
                return None;
            }
            match resolution {
                Resolution::KeepMine => session.set_baseline(record.disk_content.clone()),
                Resolution::ReloadTheirs => session.reset(record.disk_content.clone()),
            }
            Some(session.clone())
        });

        let applied = applied.flatten();
        if applied.is_none() {
            log::info!("Conflict on {} no longer applies; dropped", record.path);
        }
        Ok(applied)
    }

    /// Stop checking. Reads still in flight will be discarded when they land.
    pub fn shutdown(&self) {
        self.state.borrow_mut().shut_down = true;
    }
}

/// Turns raw focus notifications into at most one `FocusRegained` per
/// unfocused-to-focused transition.
#[derive(Debug)]
pub struct FocusTracker {
    focused: bool,
}

impl FocusTracker {
    pub fn new(focused: bool) -> Self {
        Self { focused }
    }

    pub fn focus_changed(&mut self, focused: bool) -> Option<Trigger> {
        let regained = focused && !self.focused;
        self.focused = focused;
        regained.then_some(Trigger::FocusRegained)
    }
}
