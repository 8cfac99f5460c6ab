//! # Response Envelopes
//!
//! Successful API bodies all carry `"success": true` next to their payload.

use serde::Serialize;

use crate::store::{Record, Statistics};

/// `GET /api/records`
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    pub success: bool,
    pub records: Vec<Record>,
}

impl RecordsResponse {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            success: true,
            records,
        }
    }
}

/// `GET /api/records/:id` and `POST /api/records`
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub record: Record,
}

impl RecordResponse {
    pub fn new(record: Record) -> Self {
        Self {
            success: true,
            record,
        }
    }
}

/// `DELETE /api/records/:id`
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `GET /api/statistics`
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: Statistics,
}

impl StatisticsResponse {
    pub fn new(statistics: Statistics) -> Self {
        Self {
            success: true,
            statistics,
        }
    }
}

/// `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}
