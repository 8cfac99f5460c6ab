//! # Statistics
//!
//! Aggregates over a (filtered) set of records.

use serde::Serialize;
use serde_json::Value;

use super::record::Record;

/// Scores at or above this are excellent
pub const EXCELLENT_THRESHOLD: f64 = 90.0;

/// Aggregate view of a record set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_records: usize,

    /// Mean `totalScore`, one decimal; the integer `0` for an empty set
    pub avg_score: Value,

    /// Share of excellent records, e.g. `"66.7%"`
    pub excellent_rate: String,
}

impl Statistics {
    /// Compute statistics over `records`.
    ///
    /// A record without a numeric `totalScore` counts toward the total,
    /// scores as 0, and is never excellent.
    pub fn compute(records: &[Record]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self {
                total_records: 0,
                avg_score: Value::from(0),
                excellent_rate: "0%".to_string(),
            };
        }

        let scores: Vec<f64> = records
            .iter()
            .map(|r| r.total_score().unwrap_or(0.0))
            .collect();
        let sum: f64 = scores.iter().sum();
        let excellent = scores.iter().filter(|s| **s >= EXCELLENT_THRESHOLD).count();

        let avg = sum / total as f64;
        let rate = excellent as f64 / total as f64 * 100.0;

        Self {
            total_records: total,
            avg_score: Value::from(round1(avg)),
            excellent_rate: format!("{:.1}%", rate),
        }
    }
}

/// Round to one decimal, ties to even on the exact binary value.
fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
