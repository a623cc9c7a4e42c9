//! Persistence of the recent-file list and the last active file.

use std::path::PathBuf;

use crate::app::domain::registry::RecentEntry;
use crate::app::domain::settings::{AppSettings, ThemeMode};
use crate::app::infrastructure::error::Result;

/// Settings collaborator as seen by the workspace. All mutations are idempotent.
pub trait RecentStore {
    /// Newest first.
    fn list_recent(&self) -> Vec<RecentEntry>;
    fn add_recent(&mut self, entry: RecentEntry) -> Result<()>;
    fn remove_recent(&mut self, path: &str) -> Result<()>;
    fn last_active(&self) -> Option<String>;
    fn set_last_active(&mut self, path: Option<&str>) -> Result<()>;
}

/// [`AppSettings`] plus where to persist them. `path: None` keeps everything in memory.
pub struct SettingsStore {
    settings: AppSettings,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Load from `path`, or from the platform config dir when `None`.
    pub fn open(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(AppSettings::get_config_path);
        let settings = AppSettings::load_from(&path);
        Self {
            settings,
            path: Some(path),
        }
    }

    pub fn in_memory(settings: AppSettings) -> Self {
        Self { settings, path: None }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<()> {
        self.settings.theme = theme;
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.settings.save_to(path),
            None => Ok(()),
        }
    }
}

impl RecentStore for SettingsStore {
    fn list_recent(&self) -> Vec<RecentEntry> {
        self.settings.recent_files.clone()
    }

    fn add_recent(&mut self, entry: RecentEntry) -> Result<()> {
        if self.settings.recent_files.iter().any(|e| e.path == entry.path) {
            return Ok(());
        }
        self.settings.recent_files.insert(0, entry);
        let cap = self.settings.max_recent.max(1);
        if self.settings.recent_files.len() > cap {
            self.settings.recent_files.truncate(cap);
        }
        self.persist()
    }

    fn remove_recent(&mut self, path: &str) -> Result<()> {
        let before = self.settings.recent_files.len();
        self.settings.recent_files.retain(|e| e.path != path);
        let was_active = self.settings.active_file.as_deref() == Some(path);
        if was_active {
            self.settings.active_file = None;
        }
        if before == self.settings.recent_files.len() && !was_active {
            return Ok(());
        }
        self.persist()
    }

    fn last_active(&self) -> Option<String> {
        self.settings.active_file.clone()
    }

    fn set_last_active(&mut self, path: Option<&str>) -> Result<()> {
        if self.settings.active_file.as_deref() == path {
            return Ok(());
        }
        self.settings.active_file = path.map(|p| p.to_string());
        self.persist()
    }
}
