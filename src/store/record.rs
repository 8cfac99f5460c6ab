//! # Records and Dataset
//!
//! A [`Record`] is a free-form JSON object submitted by a client, plus the two
//! fields the store assigns: `id` and `submitTime`. The [`Dataset`] is the whole
//! persisted unit: every record in insertion order and the next id to hand out.

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};

/// First id handed out by an empty dataset
pub const FIRST_ID: u64 = 1;

/// Server-assigned keys, stripped from client input before storing
const ID_KEY: &str = "id";
const SUBMIT_TIME_KEY: &str = "submitTime";

/// Client field holding the owning team leader
pub const TEAM_LEADER_KEY: &str = "teamLeader";

/// Client field holding the numeric session score
pub const TOTAL_SCORE_KEY: &str = "totalScore";

/// One scored roleplay session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Client-supplied fields, kept verbatim and in submission order
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Unique id, never reused
    pub id: u64,

    /// ISO-8601 creation time
    #[serde(rename = "submitTime", default)]
    pub submit_time: String,
}

impl Record {
    /// Team leader this record belongs to, if the client supplied one
    pub fn team_leader(&self) -> Option<&str> {
        self.fields.get(TEAM_LEADER_KEY).and_then(Value::as_str)
    }

    /// Numeric score, if present and numeric
    pub fn total_score(&self) -> Option<f64> {
        self.fields.get(TOTAL_SCORE_KEY).and_then(Value::as_f64)
    }
}

/// The full persisted dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub records: Vec<Record>,

    /// Always greater than any id ever assigned
    #[serde(default = "first_id")]
    pub next_id: u64,
}

fn first_id() -> u64 {
    FIRST_ID
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: FIRST_ID,
        }
    }
}

impl Dataset {
    /// Assign the next id and a submit time, then append.
    ///
    /// Any client-supplied `id` or `submitTime` is discarded. Fails without
    /// touching the dataset once no unused id is left.
    pub fn append(
        &mut self,
        mut fields: Map<String, Value>,
        submitted_at: DateTime<Local>,
    ) -> StoreResult<Record> {
        let id = self.next_id;
        if self.max_id().map_or(false, |max| max >= id) {
            return Err(StoreError::IdsExhausted);
        }
        let next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        fields.remove(ID_KEY);
        fields.remove(SUBMIT_TIME_KEY);

        let record = Record {
            fields,
            id,
            submit_time: format_timestamp(submitted_at),
        };
        self.next_id = next_id;
        self.records.push(record.clone());
        Ok(record)
    }

    /// Find a record by id
    pub fn find(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Remove every record with the given id, returning how many were removed
    pub fn remove(&mut self, id: u64) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before - self.records.len()
    }

    /// Largest id currently stored
    pub fn max_id(&self) -> Option<u64> {
        self.records.iter().map(|r| r.id).max()
    }

    /// Raise `next_id` above every stored id. Returns true if it had to move.
    ///
    /// Only matters for hand-edited artifacts; the store never writes a
    /// dataset that needs this. A stored `u64::MAX` id leaves `next_id`
    /// alone and every later [`Dataset::append`] fails.
    pub fn repair_next_id(&mut self) -> bool {
        match self.max_id() {
            Some(max) if self.next_id <= max => match max.checked_add(1) {
                Some(next_id) => {
                    self.next_id = next_id;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// Format a timestamp the way records and the health check carry it
pub fn format_timestamp(t: DateTime<Local>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_dataset() {
        let dataset = Dataset::default();
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.next_id, 1);
    }

    #[test]
    fn test_append_assigns_ids_in_order() {
        let mut dataset = Dataset::default();
        let a = dataset.append(fields(json!({"totalScore": 80})), Local::now()).unwrap();
        let b = dataset.append(fields(json!({"totalScore": 90})), Local::now()).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(dataset.next_id, 3);
        assert_eq!(dataset.records, vec![a, b]);
    }

    #[test]
    fn test_append_overrides_client_id_and_time() {
        let mut dataset = Dataset::default();
        let record = dataset
            .append(
                fields(json!({"id": 99, "submitTime": "yesterday", "teamLeader": "Amy"})),
                Local::now(),
            )
            .unwrap();

        assert_eq!(record.id, 1);
        assert_ne!(record.submit_time, "yesterday");
        assert!(DateTime::parse_from_rfc3339(&record.submit_time).is_ok());
        assert!(!record.fields.contains_key("id"));
        assert_eq!(record.team_leader(), Some("Amy"));
    }

    #[test]
    fn test_remove_does_not_reuse_ids() {
        let mut dataset = Dataset::default();
        dataset.append(Map::new(), Local::now()).unwrap();
        dataset.append(Map::new(), Local::now()).unwrap();

        assert_eq!(dataset.remove(2), 1);
        assert_eq!(dataset.remove(2), 0);

        let next = dataset.append(Map::new(), Local::now()).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_serialized_shape() {
        let mut dataset = Dataset::default();
        dataset
            .append(fields(json!({"totalScore": 92, "teamLeader": "Amy"})), Local::now())
            .unwrap();

        let value = serde_json::to_value(&dataset).unwrap();
        assert_eq!(value["nextId"], 2);
        assert_eq!(value["records"][0]["id"], 1);
        assert_eq!(value["records"][0]["totalScore"], 92);
        assert_eq!(value["records"][0]["teamLeader"], "Amy");
        assert!(value["records"][0]["submitTime"].is_string());
    }

    #[test]
    fn test_parse_keeps_unknown_fields() {
        let raw = r#"{"records":[{"id":4,"submitTime":"2024-01-01T00:00:00","callType":"cold","totalScore":71.5}],"nextId":7}"#;
        let dataset: Dataset = serde_json::from_str(raw).unwrap();

        assert_eq!(dataset.next_id, 7);
        let record = dataset.find(4).unwrap();
        assert_eq!(record.fields["callType"], "cold");
        assert_eq!(record.total_score(), Some(71.5));
    }

    #[test]
    fn test_repair_next_id() {
        let raw = r#"{"records":[{"id":9,"submitTime":"t"}],"nextId":3}"#;
        let mut dataset: Dataset = serde_json::from_str(raw).unwrap();

        assert!(dataset.repair_next_id());
        assert_eq!(dataset.next_id, 10);
        assert!(!dataset.repair_next_id());
    }

    #[test]
    fn test_append_at_end_of_id_space() {
        let mut dataset = Dataset {
            records: Vec::new(),
            next_id: u64::MAX,
        };

        let err = dataset.append(Map::new(), Local::now()).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.next_id, u64::MAX);
    }

    #[test]
    fn test_repair_next_id_with_max_stored_id() {
        let raw = format!(
            r#"{{"records":[{{"id":{},"submitTime":"t"}}],"nextId":3}}"#,
            u64::MAX
        );
        let mut dataset: Dataset = serde_json::from_str(&raw).unwrap();

        assert!(!dataset.repair_next_id());
        assert_eq!(dataset.next_id, 3);
        assert!(matches!(
            dataset.append(Map::new(), Local::now()),
            Err(StoreError::IdsExhausted)
        ));
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn test_total_score_non_numeric() {
        let mut dataset = Dataset::default();
        let record = dataset
            .append(fields(json!({"totalScore": "ninety"})), Local::now())
            .unwrap();
        assert_eq!(record.total_score(), None);
    }
}
