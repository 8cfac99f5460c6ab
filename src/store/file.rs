//! # File Record Store
//!
//! The dataset lives in one pretty-printed JSON file. Every operation reloads
//! it; mutations rewrite it whole.
//!
//! Writes are atomic:
//! 1. Write to `<file>.tmp`
//! 2. fsync the temp file
//! 3. Rename over the dataset file
//!
//! `add` and `delete` hold one writer lock across load → mutate → save, so
//! concurrent writers cannot lose each other's updates. Readers take no lock
//! and always see the last fully renamed file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use super::record::{Dataset, Record};
use super::{LoadPolicy, RecordStore, StoreConfig};
use crate::observability::Logger;

/// Dataset file name inside the data directory
pub const DATA_FILE_NAME: &str = "records.json";

/// JSON file-backed record store
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    temp_path: PathBuf,
    policy: LoadPolicy,
    writer: Mutex<()>,
}

impl FileRecordStore {
    pub fn new(path: impl AsRef<Path>, policy: LoadPolicy) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        temp_name.push(".tmp");
        Self {
            temp_path: path.with_file_name(temp_name),
            path,
            policy,
            writer: Mutex::new(()),
        }
    }

    pub fn open(config: &StoreConfig) -> Self {
        Self::new(config.data_file(), config.load_policy)
    }

    /// Location of the dataset file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data directory and an empty dataset if absent.
    ///
    /// Never overwrites an existing file. Returns true if a file was created.
    pub fn ensure_initialized(&self) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        let _guard = self.writer_lock();
        if self.path.exists() {
            return Ok(false);
        }
        self.write_dataset(&Dataset::default())?;
        Ok(true)
    }

    fn writer_lock(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load without applying the load policy
    fn read_dataset(&self) -> StoreResult<Dataset> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Dataset::default()),
            Err(e) => return Err(StoreError::read(&self.path, e)),
        };

        let mut dataset: Dataset =
            serde_json::from_str(&content).map_err(|e| StoreError::corrupt(&self.path, e))?;

        if dataset.repair_next_id() {
            Logger::warn(
                "STORE_NEXT_ID_REPAIRED",
                &[
                    ("next_id", &dataset.next_id.to_string()),
                    ("path", &self.path.display().to_string()),
                ],
            );
        }

        Ok(dataset)
    }

    fn write_dataset(&self, dataset: &Dataset) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
                Logger::info(
                    "DATA_DIR_CREATED",
                    &[("path", &parent.display().to_string())],
                );
            }
        }

        let content = serde_json::to_string_pretty(dataset)?;

        let result = self.write_temp(content.as_bytes()).and_then(|()| {
            fs::rename(&self.temp_path, &self.path).map_err(|e| StoreError::write(&self.path, e))
        });
        if result.is_err() {
            let _ = fs::remove_file(&self.temp_path);
            return result;
        }

        // fsync the directory so the rename itself is durable
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    fn write_temp(&self, bytes: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| StoreError::write(&self.temp_path, e))?;

        file.write_all(bytes)
            .map_err(|e| StoreError::write(&self.temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::write(&self.temp_path, e))
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self) -> StoreResult<Dataset> {
        match self.read_dataset() {
            Ok(dataset) => Ok(dataset),
            Err(e) if self.policy == LoadPolicy::FailOpen => {
                Logger::warn(
                    "STORE_LOAD_FAILED",
                    &[
                        ("fallback", "empty_dataset"),
                        ("path", &self.path.display().to_string()),
                        ("reason", &e.to_string()),
                    ],
                );
                Ok(Dataset::default())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, dataset: &Dataset) -> StoreResult<()> {
        self.write_dataset(dataset).map_err(|e| {
            Logger::error("STORE_SAVE_FAILED", &[("reason", &e.to_string())]);
            e
        })
    }

    fn add(&self, fields: Map<String, Value>) -> StoreResult<Record> {
        let _guard = self.writer_lock();

        let mut dataset = self.load()?;
        let record = dataset.append(fields, Local::now())?;
        self.save(&dataset)?;

        Logger::info("RECORD_ADDED", &[("id", &record.id.to_string())]);
        Ok(record)
    }

    fn delete(&self, id: u64) -> StoreResult<()> {
        let _guard = self.writer_lock();

        let mut dataset = self.load()?;
        let removed = dataset.remove(id);
        self.save(&dataset)?;

        Logger::info(
            "RECORD_DELETED",
            &[("id", &id.to_string()), ("removed", &removed.to_string())],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, policy: LoadPolicy) -> FileRecordStore {
        FileRecordStore::new(dir.path().join("data").join(DATA_FILE_NAME), policy)
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_temp_path_sits_beside_dataset() {
        let store = FileRecordStore::new("/srv/data/records.json", LoadPolicy::FailOpen);
        assert_eq!(store.temp_path, PathBuf::from("/srv/data/records.json.tmp"));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, LoadPolicy::Strict);

        assert_eq!(store.load().unwrap(), Dataset::default());
    }

    #[test]
    fn test_ensure_initialized_creates_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, LoadPolicy::Strict);

        assert!(store.ensure_initialized().unwrap());
        store.add(fields(json!({"totalScore": 70}))).unwrap();
        assert!(!store.ensure_initialized().unwrap());

        assert_eq!(store.load().unwrap().records.len(), 1);
    }

    #[test]
    fn test_add_persists_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, LoadPolicy::Strict);

        let record = store.add(fields(json!({"totalScore": 92, "teamLeader": "Amy"}))).unwrap();
        assert_eq!(record.id, 1);
        assert!(!store.temp_path.exists());

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["nextId"], 2);
        assert_eq!(value["records"][0]["teamLeader"], "Amy");
    }

    #[test]
    fn test_corrupt_file_fail_open() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, LoadPolicy::FailOpen);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load().unwrap(), Dataset::default());
        assert_eq!(store.add(Map::new()).unwrap().id, 1);
    }

    #[test]
    fn test_corrupt_file_strict() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, LoadPolicy::Strict);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"records": "oops"}"#).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(store.add(Map::new()).is_err());
        // The corrupt file is left alone
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            r#"{"records": "oops"}"#
        );
    }

    #[test]
    fn test_add_fails_once_ids_run_out() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, LoadPolicy::Strict);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let raw = format!(r#"{{"records": [], "nextId": {}}}"#, u64::MAX);
        fs::write(store.path(), &raw).unwrap();

        assert!(matches!(
            store.add(Map::new()).unwrap_err(),
            StoreError::IdsExhausted
        ));
        // Nothing was written and reads still work
        assert_eq!(fs::read_to_string(store.path()).unwrap(), raw);
        assert_eq!(store.load().unwrap().next_id, u64::MAX);
    }

    #[test]
    fn test_unwritable_location_reports_failure() {
        let dir = TempDir::new().unwrap();
        // A regular file where the data directory should be
        let blocker = dir.path().join("data");
        fs::write(&blocker, "").unwrap();
        let store = store_in(&dir, LoadPolicy::FailOpen);

        let err = store.add(Map::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(store.delete(1).is_err());
    }
}
