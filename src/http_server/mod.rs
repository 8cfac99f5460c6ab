//! # HTTP Server Module
//!
//! Maps HTTP requests onto record store operations.
//!
//! # Endpoints
//!
//! - `GET /api/records` - List records (`role`, `username` filter)
//! - `GET /api/records/:id` - Fetch one record
//! - `POST /api/records` - Add a record
//! - `DELETE /api/records/:id` - Delete a record
//! - `GET /api/statistics` - Aggregates (`role`, `username` filter)
//! - `GET /api/health` - Health check
//!
//! Anything else outside `/api` is served from the static directory.

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod launch;
pub mod middleware;
pub mod record_routes;
pub mod response;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
