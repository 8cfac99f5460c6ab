//! Health HTTP Route

use axum::{routing::get, Json, Router};
use chrono::Local;

use super::response::HealthResponse;
use crate::store::format_timestamp;

/// Create the health route (mounted under /api)
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: format_timestamp(Local::now()),
    })
}
