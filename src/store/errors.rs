//! # Store Errors
//!
//! Error types for the record store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted artifact exists but could not be read
    #[error("Failed to read {}: {}", .path.display(), .reason)]
    Read { path: PathBuf, reason: String },

    /// The persisted artifact was read but is not a valid dataset
    #[error("Corrupt dataset in {}: {}", .path.display(), .reason)]
    Corrupt { path: PathBuf, reason: String },

    /// The dataset could not be written back
    #[error("Failed to write {}: {}", .path.display(), .reason)]
    Write { path: PathBuf, reason: String },

    /// The dataset could not be serialized
    #[error("Failed to serialize dataset: {0}")]
    Serialize(String),

    /// Every id up to `u64::MAX` has been handed out
    #[error("No record ids left to assign")]
    IdsExhausted,

    /// In-memory store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}
