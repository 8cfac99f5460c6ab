//! Record HTTP Routes
//!
//! Each handler performs exactly one record store operation. Mutations run
//! on the blocking pool since the file store holds its writer lock across
//! disk reads, writes and fsync.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};
use super::response::{RecordResponse, RecordsResponse, StatisticsResponse, SuccessResponse};
use crate::store::{RecordFilter, RecordStore};

// ==================
// Shared State
// ==================

/// Record store shared across handlers
#[derive(Debug, Clone)]
pub struct RecordState {
    pub store: Arc<dyn RecordStore>,
}

impl RecordState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

// ==================
// Record Routes
// ==================

/// Create record and statistics routes (mounted under /api)
pub fn record_routes(state: Arc<RecordState>) -> Router {
    Router::new()
        .route("/records", get(list_records_handler).post(add_record_handler))
        .route(
            "/records/:id",
            get(get_record_handler).delete(delete_record_handler),
        )
        .route("/statistics", get(statistics_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// Run a store call on tokio's blocking pool
async fn run_blocking<T, F>(state: &RecordState, op: F) -> ApiResult<T>
where
    F: FnOnce(&dyn RecordStore) -> T + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || op(&*store))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))
}

fn parse_record_body(body: &[u8]) -> ApiResult<Map<String, Value>> {
    if body.is_empty() {
        return Err(ApiError::InvalidBody("body is empty".to_string()));
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

// ==================
// Handlers
// ==================

async fn list_records_handler(
    State(state): State<Arc<RecordState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<RecordsResponse>> {
    let filter = RecordFilter::from_query_pairs(params);
    let records = state.store.list(&filter).map_err(ApiError::LoadFailed)?;
    Ok(Json(RecordsResponse::new(records)))
}

async fn get_record_handler(
    State(state): State<Arc<RecordState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<RecordResponse>> {
    let id = parse_id(&raw_id)?;

    let record = state
        .store
        .get(id)
        .map_err(ApiError::LoadFailed)?
        .ok_or(ApiError::RecordNotFound(id))?;

    Ok(Json(RecordResponse::new(record)))
}

async fn add_record_handler(
    State(state): State<Arc<RecordState>>,
    body: Bytes,
) -> ApiResult<Json<RecordResponse>> {
    let fields = parse_record_body(&body)?;
    let record = run_blocking(&state, move |store| store.add(fields))
        .await?
        .map_err(ApiError::SaveFailed)?;
    Ok(Json(RecordResponse::new(record)))
}

async fn delete_record_handler(
    State(state): State<Arc<RecordState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let id = parse_id(&raw_id)?;
    run_blocking(&state, move |store| store.delete(id))
        .await?
        .map_err(ApiError::DeleteFailed)?;
    Ok(Json(SuccessResponse::ok()))
}

async fn statistics_handler(
    State(state): State<Arc<RecordState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<StatisticsResponse>> {
    let filter = RecordFilter::from_query_pairs(params);
    let statistics = state
        .store
        .statistics(&filter)
        .map_err(ApiError::LoadFailed)?;
    Ok(Json(StatisticsResponse::new(statistics)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("-1"), Err(ApiError::InvalidId(_))));
        assert!(matches!(parse_id("abc"), Err(ApiError::InvalidId(_))));
    }

    #[test]
    fn test_parse_record_body() {
        let fields = parse_record_body(br#"{"totalScore": 92}"#).unwrap();
        assert_eq!(fields["totalScore"], 92);

        assert!(matches!(parse_record_body(b""), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_record_body(b"{oops"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_record_body(b"[1, 2]"), Err(ApiError::InvalidBody(_))));
    }
}
