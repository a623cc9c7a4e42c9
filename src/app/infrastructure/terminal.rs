//! Launching a terminal emulator next to the script being edited.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::error::{AppError, Result};

/// Tried in order after `$TERMINAL`.
pub const TERMINAL_CANDIDATES: &[&str] = &[
    "x-terminal-emulator",
    "xdg-terminal-exec",
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "kitty",
    "alacritty",
];

/// The user's preferred terminal first (if set), then the known candidates.
pub fn terminal_candidates(preferred: Option<&str>) -> Vec<String> {
    let preferred = preferred.map(str::trim).filter(|t| !t.is_empty());
    preferred
        .into_iter()
        .chain(TERMINAL_CANDIDATES.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Directory a script lives in. A bare file name means the working directory.
pub fn script_dir(path: &str) -> PathBuf {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Open a terminal in `dir` without waiting for it. Returns the program that started.
pub fn open_terminal(dir: &Path) -> Result<String> {
    if !cfg!(target_os = "linux") {
        return Err(AppError::Command("Opening a terminal is only supported on Linux".to_string()));
    }
    let preferred = std::env::var("TERMINAL").ok();
    launch_first(dir, &terminal_candidates(preferred.as_deref()))
}

/// Spawn the first candidate that starts, detached from our stdio.
pub fn launch_first(dir: &Path, candidates: &[String]) -> Result<String> {
    for program in candidates {
        let spawned = Command::new(program)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => {
                log::info!("Started {} in {}", program, dir.display());
                return Ok(program.clone());
            }
            Err(e) => log::debug!("{} did not start: {}", program, e),
        }
    }
    Err(AppError::Command(
        "Could not find a terminal. Try setting the $TERMINAL environment variable.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_terminal_goes_first() {
        let candidates = terminal_candidates(Some("foot"));
        assert_eq!(candidates[0], "foot");
        assert_eq!(candidates[1], "x-terminal-emulator");
        assert_eq!(candidates.len(), TERMINAL_CANDIDATES.len() + 1);
    }

    #[test]
    fn test_no_preference_keeps_default_order() {
        let expected: Vec<String> = TERMINAL_CANDIDATES.iter().map(|s| s.to_string()).collect();
        assert_eq!(terminal_candidates(None), expected);
        assert_eq!(terminal_candidates(Some("  ")), expected);
    }

    #[test]
    fn test_script_dir() {
        assert_eq!(script_dir("/home/user/bin/run.sh"), PathBuf::from("/home/user/bin"));
        assert_eq!(script_dir("run.sh"), PathBuf::from("."));
    }

    #[test]
    fn test_missing_terminals_is_command_error() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec!["bashellit-no-such-terminal".to_string()];
        let err = launch_first(dir.path(), &candidates).unwrap_err();
        assert!(matches!(err, AppError::Command(_)));
        assert!(err.to_string().contains("$TERMINAL"));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_program_that_starts_wins() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec!["bashellit-no-such-terminal".to_string(), "true".to_string()];
        assert_eq!(launch_first(dir.path(), &candidates).unwrap(), "true");
    }
}
