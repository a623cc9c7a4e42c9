use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A save was requested while another save of the same file is still running.
    #[error("Save already in progress for {0}")]
    Busy(String),

    #[error("No file is currently open")]
    NoActiveSession,

    #[error("Unknown file: {0}")]
    UnknownFile(String),

    #[error("No pending conflict to resolve")]
    NoConflict,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Highlight error: {0}")]
    Classify(String),

    #[error("{0}")]
    Command(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
