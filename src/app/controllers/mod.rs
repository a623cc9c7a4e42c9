//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and storage:
//! - Workspace: registry, sessions, open/select/save
//! - Reconciliation: detecting and resolving external changes

pub mod reconcile;
pub mod workspace;
