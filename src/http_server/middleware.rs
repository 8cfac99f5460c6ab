//! HTTP middleware: request log, CORS header stamping, panic recovery.

use std::any::Any;

use axum::extract::Request;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::errors::ApiError;
use crate::observability::Logger;

/// Methods advertised on every response
pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// Request headers advertised on every response
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Log one line per request once the response is known
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    Logger::info(
        "HTTP_REQUEST",
        &[
            ("method", method.as_str()),
            ("path", &path),
            ("status", response.status().as_str()),
        ],
    );
    response
}

/// Advertise the allowed methods and headers on non-preflight responses.
///
/// `CorsLayer` only sends these on OPTIONS; browsers and the existing
/// frontend expect them everywhere.
pub async fn cors_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

/// Turn a handler panic into a 500 for that request only
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(detail).into_response()
}
