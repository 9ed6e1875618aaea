use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the backing store capability. Single-operation granularity;
/// the engine never assumes multi-file atomicity on top of these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// Errors raised while scanning the source directory for eligible entries.
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Source directory missing: {0}")]
    SourceDirMissing(PathBuf),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by a single plan step. Steps are isolated: one failing
/// step never rolls back the effects of the steps before it.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Artifact already exists at {0}")]
    Conflict(PathBuf),

    #[error("Batch contains no entries")]
    EmptyBatch,
}
