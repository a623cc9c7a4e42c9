use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::registry::RecentEntry;
use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Kali,
    BashLight,
    BashDark,
}

impl ThemeMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Kali => "kali",
            Self::BashLight => "bash-light",
            Self::BashDark => "bash-dark",
        }
    }

    pub fn all() -> &'static [ThemeMode] {
        &[
            Self::Light,
            Self::Dark,
            Self::Kali,
            Self::BashLight,
            Self::BashDark,
        ]
    }
}

impl FromStr for ThemeMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::all().iter().map(|t| t.name()).collect();
                AppError::Settings(format!("Invalid theme: {}. Available themes: {}", s, names.join(", ")))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Newest first.
    #[serde(default)]
    pub recent_files: Vec<RecentEntry>,

    #[serde(default)]
    pub active_file: Option<String>,

    #[serde(default)]
    pub theme: ThemeMode,

    /// Seconds between disk checks of the open script
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

fn default_check_interval() -> u64 {
    5
}

fn default_max_recent() -> usize {
    20
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            active_file: None,
            theme: ThemeMode::default(),
            check_interval_secs: default_check_interval(),
            max_recent: default_max_recent(),
        }
    }
}

impl AppSettings {
    /// Interval actually used for polling; never below one second.
    pub fn check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.check_interval_secs.max(1))
    }

    /// Load settings from `path`, falling back to defaults if missing or corrupt.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to `path`, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("bashellit");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert!(settings.recent_files.is_empty());
        assert_eq!(settings.active_file, None);
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.check_interval_secs, 5);
        assert_eq!(settings.max_recent, 20);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"theme": "bash-dark"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.theme, ThemeMode::BashDark);
        assert_eq!(settings.check_interval_secs, 5);
    }

    #[test]
    fn test_interval_is_floored() {
        let settings = AppSettings {
            check_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(settings.check_interval(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("kali".parse::<ThemeMode>().unwrap(), ThemeMode::Kali);
        let err = "neon".parse::<ThemeMode>().unwrap_err();
        assert!(err.to_string().contains("Invalid theme: neon"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            recent_files: vec![RecentEntry::new("/tmp/a.sh")],
            active_file: Some("/tmp/a.sh".to_string()),
            theme: ThemeMode::Dark,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }
}
