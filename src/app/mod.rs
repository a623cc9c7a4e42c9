//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (FileSession, ConflictRecord, Registry, Settings, Messages)
//! - `controllers/` - Orchestration (Workspace, Reconciler)
//! - `services/` - Business operations (formatter, classifier, text_ops, recent-file store)
//! - `infrastructure/` - External integrations (storage, logging, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::reconcile::{CheckOutcome, FocusTracker, Reconciler, SkipReason, Trigger};
pub use controllers::workspace::Workspace;
pub use domain::{AppSettings, ConflictRecord, FileSession, Message, RecentEntry, Resolution, ThemeMode};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::storage::{FsStorage, MemoryStorage, Storage};
pub use services::format::format_script;
pub use services::recent::{RecentStore, SettingsStore};
pub use services::syntax::{ShellClassifier, StyleClass, StyledSpan};
pub use state::{AppState, Output};
