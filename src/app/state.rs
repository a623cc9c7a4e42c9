//! Main application coordinator.
//!
//! `AppState` wires the workspace, the reconciler, the classifier and the
//! settings store together and turns each [`Message`] into an [`Output`] for
//! the front end.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::app::controllers::reconcile::{CheckOutcome, FocusTracker, Reconciler, Trigger};
use crate::app::controllers::workspace::Workspace;
use crate::app::domain::conflict::{ConflictRecord, Resolution};
use crate::app::domain::messages::{Message, HELP};
use crate::app::domain::settings::ThemeMode;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::storage::Storage;
use crate::app::infrastructure::terminal::{open_terminal, script_dir};
use crate::app::services::recent::SettingsStore;
use crate::app::services::syntax::ShellClassifier;
use crate::app::services::text_ops::{append_line, delete_line, replace_all_in_text, replace_line};
use crate::ui::render;
use crate::ui::theme::Palette;

/// What the front end should do after a message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Nothing,
    Text(String),
    Quit,
}

pub struct AppState {
    store: Rc<RefCell<SettingsStore>>,
    workspace: Rc<Workspace>,
    reconciler: Reconciler,
    classifier: ShellClassifier,
    focus: RefCell<FocusTracker>,
}

impl AppState {
    pub fn new(storage: Rc<dyn Storage>, store: SettingsStore) -> Self {
        let store = Rc::new(RefCell::new(store));
        let workspace = Rc::new(Workspace::new(storage, store.clone()));
        let reconciler = Reconciler::new(workspace.clone());
        Self {
            store,
            workspace,
            reconciler,
            classifier: ShellClassifier::new(),
            focus: RefCell::new(FocusTracker::new(true)),
        }
    }

    pub fn workspace(&self) -> &Rc<Workspace> {
        &self.workspace
    }

    pub fn check_interval(&self) -> Duration {
        self.store.borrow().settings().check_interval()
    }

    pub fn theme(&self) -> ThemeMode {
        self.store.borrow().settings().theme
    }

    fn palette(&self) -> Palette {
        Palette::for_theme(self.theme())
    }

    /// Reopen the last active file. Failures are reported, not fatal.
    pub async fn restore(&self) -> Output {
        match self.workspace.restore().await {
            Ok(Some(session)) => Output::Text(format!("Restored {}", render::title(&session))),
            Ok(None) => Output::Nothing,
            Err(e) => {
                log::warn!("Could not restore last session: {}", e);
                Output::Text(format!("Could not restore last session: {}", e))
            }
        }
    }

    pub fn shutdown(&self) {
        self.reconciler.shutdown();
    }

    pub async fn handle_message(&self, message: Message) -> Result<Output> {
        log::trace!("Handling {:?}", message);
        match message {
            Message::Open(path) => {
                let session = self.workspace.open(&path).await?;
                Ok(Output::Text(render::listing(&session, &self.palette())))
            }
            Message::Select(path) => {
                let session = self.workspace.select(&path).await?;
                Ok(Output::Text(render::listing(&session, &self.palette())))
            }
            Message::Remove(path) => {
                self.workspace.remove(&path)?;
                Ok(Output::Text(format!("Removed {}", path)))
            }
            Message::ListRecent => Ok(Output::Text(render::recent_list(
                &self.workspace.entries(),
                self.workspace.current_path().as_deref(),
            ))),
            Message::Save => {
                self.workspace.save().await?;
                let path = self.workspace.current_path().unwrap_or_default();
                Ok(Output::Text(format!("Saved {}", path)))
            }
            Message::Quit => {
                self.shutdown();
                if let Some(session) = self.workspace.current().filter(|s| s.is_dirty()) {
                    log::warn!("Quitting with unsaved edits in {}", session.path());
                }
                Ok(Output::Quit)
            }

            Message::Append(line) => self.edit_with(|text| Ok(append_line(text, &line))),
            Message::SetLine(n, line) => self.edit_with(|text| {
                replace_line(text, n, &line).ok_or_else(|| out_of_range(n))
            }),
            Message::DeleteLine(n) => {
                self.edit_with(|text| delete_line(text, n).ok_or_else(|| out_of_range(n)))
            }
            Message::Replace(from, to) => {
                let current = self.current_text()?;
                let (text, count) = replace_all_in_text(&current, &from, &to);
                if count > 0 {
                    self.workspace.edit(text)?;
                }
                Ok(Output::Text(format!("Replaced {} occurrence(s)", count)))
            }
            Message::Format => {
                let changed = self.workspace.format_current()?;
                Ok(Output::Text(if changed { "Formatted" } else { "Already formatted" }.to_string()))
            }

            Message::Print => {
                let session = self.workspace.current().ok_or(AppError::NoActiveSession)?;
                Ok(Output::Text(render::listing(&session, &self.palette())))
            }
            Message::Highlight => {
                let session = self.workspace.current().ok_or(AppError::NoActiveSession)?;
                let lines = self.classifier.classify_text(session.working());
                Ok(Output::Text(render::highlighted(&session, &lines, &self.palette())))
            }
            Message::Status => {
                let conflict = self.reconciler.pending_conflict();
                Ok(Output::Text(render::status(
                    self.workspace.current().as_ref(),
                    conflict.as_ref(),
                )))
            }
            Message::SetTheme(name) => {
                let theme: ThemeMode = name.parse()?;
                self.store.borrow_mut().set_theme(theme)?;
                Ok(Output::Text(format!("Theme set to {}", theme.name())))
            }

            Message::Shell => {
                let path = self.workspace.current_path().ok_or(AppError::NoActiveSession)?;
                let dir = script_dir(&path);
                let program = open_terminal(&dir)?;
                Ok(Output::Text(format!("Opened {} in {}", program, dir.display())))
            }

            Message::Tick => Ok(self.run_check(Trigger::Tick).await),
            Message::Check => Ok(self.run_check(Trigger::Manual).await),
            Message::FocusGained => {
                let trigger = self.focus.borrow_mut().focus_changed(true);
                match trigger {
                    Some(trigger) => Ok(self.run_check(trigger).await),
                    None => Ok(Output::Nothing),
                }
            }
            Message::FocusLost => {
                self.focus.borrow_mut().focus_changed(false);
                Ok(Output::Nothing)
            }
            Message::KeepMine => self.resolve(Resolution::KeepMine),
            Message::ReloadTheirs => self.resolve(Resolution::ReloadTheirs),

            Message::Help => Ok(Output::Text(HELP.to_string())),
        }
    }

    fn current_text(&self) -> Result<String> {
        self.workspace
            .current()
            .map(|s| s.working().to_string())
            .ok_or(AppError::NoActiveSession)
    }

    fn edit_with(&self, f: impl FnOnce(&str) -> Result<String>) -> Result<Output> {
        let text = f(&self.current_text()?)?;
        let session = self.workspace.edit(text)?;
        Ok(Output::Text(render::title(&session)))
    }

    async fn run_check(&self, trigger: Trigger) -> Output {
        let manual = trigger == Trigger::Manual;
        match self.reconciler.check(trigger).await {
            CheckOutcome::Adopted(path) => Output::Text(format!("{} changed on disk; reloaded", path)),
            CheckOutcome::Conflict(record) => Output::Text(self.conflict_notice(&record)),
            CheckOutcome::ReadFailed if manual => Output::Text("Could not read the file; will retry".to_string()),
            CheckOutcome::Unchanged if manual => Output::Text("No external changes".to_string()),
            CheckOutcome::Skipped(reason) if manual => Output::Text(format!("Check skipped: {:?}", reason)),
            _ => Output::Nothing,
        }
    }

    fn conflict_notice(&self, record: &ConflictRecord) -> String {
        let working = self
            .workspace
            .with_session(&record.path, |s| s.working().to_string())
            .unwrap_or_default();
        render::conflict_notice(record, &working, &self.palette())
    }

    fn resolve(&self, resolution: Resolution) -> Result<Output> {
        let text = match self.reconciler.resolve(resolution)? {
            Some(session) => match resolution {
                Resolution::KeepMine => format!("Kept your edits to {}", render::title(&session)),
                Resolution::ReloadTheirs => format!("Reloaded {} from disk", session.display_name()),
            },
            None => "The file changed again since; conflict dismissed".to_string(),
        };
        Ok(Output::Text(text))
    }
}

fn out_of_range(n: usize) -> AppError {
    AppError::Command(format!("no line {}", n))
}
