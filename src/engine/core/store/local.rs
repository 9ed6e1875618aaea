use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::EntryStore;
use crate::engine::errors::StoreError;

/// Local-disk implementation of the store capability over `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[async_trait]
impl EntryStore for LocalStore {
    async fn list_children(&self, dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
        let mut children = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        while let Some(dirent) = read_dir.next_entry().await? {
            if dirent.file_type().await?.is_file() {
                children.push(dirent.path());
            }
        }
        Ok(children)
    }

    async fn read(&self, path: &Path) -> Result<String, StoreError> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        Ok(tokio::fs::write(path, contents).await?)
    }

    async fn create(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists(path.to_path_buf())
                } else {
                    StoreError::Io(e)
                }
            })?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
        Ok(tokio::fs::rename(from, to).await?)
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
        tokio::fs::copy(from, to).await?;
        Ok(())
    }

    async fn delete(&self, path: &Path) -> Result<(), StoreError> {
        Ok(tokio::fs::remove_file(path).await?)
    }

    async fn create_dir_all(&self, dir: &Path) -> Result<(), StoreError> {
        Ok(tokio::fs::create_dir_all(dir).await?)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}
