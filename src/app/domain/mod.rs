//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - File sessions and conflict records
//! - The recent-file registry
//! - Application settings
//! - Message types for the shell loop

pub mod conflict;
pub mod messages;
pub mod registry;
pub mod session;
pub mod settings;

pub use conflict::{ConflictRecord, Resolution};
pub use messages::Message;
pub use registry::{RecentEntry, Registry};
pub use session::FileSession;
pub use settings::{AppSettings, ThemeMode};
