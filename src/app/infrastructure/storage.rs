//! File storage seam.
//!
//! Everything that touches script contents on disk goes through [`Storage`] so
//! the session and reconciliation logic can be driven against an in-memory
//! backend in tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

use async_trait::async_trait;

use super::error::Result;

#[async_trait(?Send)]
pub trait Storage {
    async fn read(&self, path: &str) -> Result<String>;
    async fn write(&self, path: &str, text: &str) -> Result<()>;
}

/// Real filesystem backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

#[async_trait(?Send)]
impl Storage for FsStorage {
    async fn read(&self, path: &str) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn write(&self, path: &str, text: &str) -> Result<()> {
        tokio::fs::write(path, text).await?;
        Ok(())
    }
}

/// In-process backend. Every operation yields to the scheduler once before it
/// completes, so concurrent callers interleave the way they would on real I/O.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file "on disk" without going through `write`.
    pub fn insert(&self, path: &str, text: &str) {
        self.files.borrow_mut().insert(path.to_string(), text.to_string());
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn delete(&self, path: &str) {
        self.files.borrow_mut().remove(path);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

#[async_trait(?Send)]
impl Storage for MemoryStorage {
    async fn read(&self, path: &str) -> Result<String> {
        tokio::task::yield_now().await;
        if self.fail_reads.get() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read refused").into());
        }
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path)).into())
    }

    async fn write(&self, path: &str, text: &str) -> Result<()> {
        tokio::task::yield_now().await;
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "write refused").into());
        }
        self.files.borrow_mut().insert(path.to_string(), text.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::error::AppError;

    #[tokio::test]
    async fn test_fs_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.sh");
        let path = path.to_str().unwrap();

        FsStorage.write(path, "echo hi\n").await.unwrap();
        assert_eq!(FsStorage.read(path).await.unwrap(), "echo hi\n");
    }

    #[tokio::test]
    async fn test_fs_storage_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sh");
        let err = FsStorage.read(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[tokio::test]
    async fn test_memory_storage_failures() {
        let storage = MemoryStorage::new();
        storage.insert("a.sh", "x");

        storage.set_fail_reads(true);
        assert!(storage.read("a.sh").await.is_err());
        storage.set_fail_reads(false);
        assert_eq!(storage.read("a.sh").await.unwrap(), "x");

        storage.set_fail_writes(true);
        assert!(storage.write("a.sh", "y").await.is_err());
        assert_eq!(storage.contents("a.sh").as_deref(), Some("x"));
        assert_eq!(storage.write_count(), 0);
    }
}
