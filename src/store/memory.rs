//! In-memory record store

use std::sync::RwLock;

use chrono::Local;
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use super::record::{Dataset, Record};
use super::RecordStore;

/// Record store holding the dataset in memory
#[derive(Debug, Default)]
pub struct MemRecordStore {
    dataset: RwLock<Dataset>,
}

impl MemRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemRecordStore {
    fn load(&self) -> StoreResult<Dataset> {
        let dataset = self.dataset.read().map_err(|_| StoreError::Poisoned)?;
        Ok(dataset.clone())
    }

    fn save(&self, dataset: &Dataset) -> StoreResult<()> {
        let mut current = self.dataset.write().map_err(|_| StoreError::Poisoned)?;
        *current = dataset.clone();
        Ok(())
    }

    fn add(&self, fields: Map<String, Value>) -> StoreResult<Record> {
        let mut dataset = self.dataset.write().map_err(|_| StoreError::Poisoned)?;
        dataset.append(fields, Local::now())
    }

    fn delete(&self, id: u64) -> StoreResult<()> {
        let mut dataset = self.dataset.write().map_err(|_| StoreError::Poisoned)?;
        dataset.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordFilter;
    use serde_json::json;

    #[test]
    fn test_mem_store_operations() {
        let store = MemRecordStore::new();
        let leader = |name: &str| json!({"teamLeader": name, "totalScore": 95}).as_object().cloned().unwrap();

        store.add(leader("A")).unwrap();
        store.add(leader("B")).unwrap();

        assert_eq!(store.list(&RecordFilter::leader("B")).unwrap().len(), 1);
        assert_eq!(store.get(1).unwrap().unwrap().team_leader(), Some("A"));

        store.delete(1).unwrap();
        assert!(store.get(1).unwrap().is_none());
        assert_eq!(store.add(Map::new()).unwrap().id, 3);
    }
}
