pub mod local;

pub use local::LocalStore;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::engine::errors::StoreError;

/// Filesystem capability consumed by the engine. The engine relies only on
/// the atomicity of each single operation; it never assumes two calls
/// commit together, which is why disposal is ordered after the artifact
/// mutation of the same step.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Immediate regular-file children of `dir`. Subdirectories are not
    /// listed and not descended into.
    async fn list_children(&self, dir: &Path) -> Result<Vec<PathBuf>, StoreError>;

    async fn read(&self, path: &Path) -> Result<String, StoreError>;

    /// Create-or-overwrite.
    async fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError>;

    /// Create-only; fails with `StoreError::AlreadyExists` when the path is
    /// taken.
    async fn create(&self, path: &Path, contents: &str) -> Result<(), StoreError>;

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError>;

    /// Byte-for-byte copy.
    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StoreError>;

    async fn delete(&self, path: &Path) -> Result<(), StoreError>;

    async fn create_dir_all(&self, dir: &Path) -> Result<(), StoreError>;

    async fn is_dir(&self, path: &Path) -> bool;
}
