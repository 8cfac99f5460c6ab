//! # API Errors
//!
//! Every failure leaves the router as `{"success": false, "error": "..."}`
//! with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::Logger;
use crate::store::StoreError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Request-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Path id is not an unsigned integer
    #[error("Invalid record id: {0}")]
    InvalidId(String),

    /// Body is missing, not JSON, or not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Record not found")]
    RecordNotFound(u64),

    /// Unmatched path under /api
    #[error("Not found")]
    RouteNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Failed to save record")]
    SaveFailed(#[source] StoreError),

    #[error("Failed to delete record")]
    DeleteFailed(#[source] StoreError),

    /// Only reachable under the strict load policy
    #[error("Failed to load records")]
    LoadFailed(#[source] StoreError),

    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::RecordNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::SaveFailed(_)
            | ApiError::DeleteFailed(_)
            | ApiError::LoadFailed(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            ApiError::SaveFailed(e) | ApiError::DeleteFailed(e) | ApiError::LoadFailed(e) => {
                Some(e.to_string())
            }
            ApiError::Internal(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            let detail = self.detail().unwrap_or_default();
            Logger::error(
                "REQUEST_FAILED",
                &[("detail", &detail), ("error", &self.to_string())],
            );
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidId("abc".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RecordNotFound(3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::RouteNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::SaveFailed(StoreError::Poisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_hides_store_detail() {
        let err = ApiError::DeleteFailed(StoreError::Poisoned);
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to delete record");
    }
}
