//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Script formatting
//! - Recent-file persistence
//! - Text operations
//! - Syntax classification

pub mod format;
pub mod recent;
pub mod syntax;
pub mod text_ops;
