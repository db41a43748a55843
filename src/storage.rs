use std::path::PathBuf;

use thiserror::Error;

use crate::models::store::Store;

pub mod json;
#[cfg(test)]
pub mod memory;
pub mod migrations;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load store from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save store to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store has a malformed 'version' field: {0}")]
    InvalidVersion(String),

    #[error("Store migration from version {from} failed: {reason}")]
    MigrationFailed { from: u32, reason: String },

    #[error(
        "Store file was created by a newer version of jira-lite (version {0}). Please upgrade jira-lite to open this file."
    )]
    FutureVersion(u32),

    #[error(
        "Store file has unsupported version {0}. This version of jira-lite cannot read this file."
    )]
    UnsupportedVersion(u32),
}

/// Whole-document persistence: every save replaces everything that was there.
pub trait Storage {
    fn load(&self) -> Result<Store, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;

    /// Load, apply `mutate`, save. Nothing is written when `mutate` fails.
    ///
    /// Implementations shared between processes hold their lock for the whole
    /// cycle, so concurrent updates are applied one after the other.
    fn update<T, E>(&self, mutate: impl FnOnce(&mut Store) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let mut store = self.load()?;
        let value = mutate(&mut store)?;
        self.save(&store)?;
        Ok(value)
    }
}
