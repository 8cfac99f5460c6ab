//! # Record Store
//!
//! Owns the persisted dataset of scored roleplay sessions and its invariants:
//!
//! - ids are unique and never reused, even after deletion
//! - `nextId` stays above every id ever assigned
//! - the whole dataset is the unit of persistence
//!
//! Callers talk to the [`RecordStore`] trait. [`FileRecordStore`] keeps the
//! dataset in a single JSON file and reloads it on every operation;
//! [`MemRecordStore`] keeps it in memory.

mod errors;
mod file;
mod filter;
mod memory;
mod record;
mod statistics;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use errors::{StoreError, StoreResult};
pub use file::{FileRecordStore, DATA_FILE_NAME};
pub use filter::{RecordFilter, LEADER_ROLE};
pub use memory::MemRecordStore;
pub use record::{format_timestamp, Dataset, Record, FIRST_ID, TEAM_LEADER_KEY, TOTAL_SCORE_KEY};
pub use statistics::{Statistics, EXCELLENT_THRESHOLD};

/// Access contract for the record dataset
pub trait RecordStore: Send + Sync + fmt::Debug {
    /// Load the whole dataset
    fn load(&self) -> StoreResult<Dataset>;

    /// Replace the whole persisted dataset
    fn save(&self, dataset: &Dataset) -> StoreResult<()>;

    /// Assign id and submit time, append, persist
    fn add(&self, fields: Map<String, Value>) -> StoreResult<Record>;

    /// Remove every record with this id and persist. A missing id is not an error.
    fn delete(&self, id: u64) -> StoreResult<()>;

    /// All records passing `filter`, in stored order
    fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        Ok(filter.apply(self.load()?.records))
    }

    /// Look up one record by id
    fn get(&self, id: u64) -> StoreResult<Option<Record>> {
        Ok(self.load()?.find(id).cloned())
    }

    /// Aggregate over the records passing `filter`
    fn statistics(&self, filter: &RecordFilter) -> StoreResult<Statistics> {
        Ok(Statistics::compute(&self.list(filter)?))
    }
}

/// What to do when the persisted artifact exists but cannot be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Log a warning and serve an empty dataset. The API keeps answering
    /// successfully, so corruption only shows up in the logs.
    #[default]
    FailOpen,

    /// Surface the failure to the caller
    Strict,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the dataset file (default: "data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub load_policy: LoadPolicy,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Path of the dataset file
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_config() {
        let config = StoreConfig::default();
        assert_eq!(config.data_file(), PathBuf::from("data").join("records.json"));
        assert_eq!(config.load_policy, LoadPolicy::FailOpen);
    }

    #[test]
    fn test_load_policy_from_json() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"data_dir": "/srv/drill", "load_policy": "strict"}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/drill"));
        assert_eq!(config.load_policy, LoadPolicy::Strict);
    }
}
