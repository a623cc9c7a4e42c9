//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Error types
//! - Logger setup
//! - File storage backends
//! - Terminal launcher

pub mod error;
pub mod logging;
pub mod storage;
pub mod terminal;
