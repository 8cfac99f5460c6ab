//! # HTTP Server
//!
//! Combines the API routers, the static file fallback and the middleware
//! stack into one axum server.

use std::path::Path;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::middleware::from_fn;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::config::HttpServerConfig;
use super::errors::ApiError;
use super::health_routes::health_routes;
use super::launch::{local_ip, open_browser_later};
use super::middleware::{cors_headers, handle_panic, log_requests};
use super::record_routes::{record_routes, RecordState};
use crate::observability::Logger;
use crate::store::RecordStore;

/// HTTP server for the record API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given record store
    pub fn new(config: HttpServerConfig, store: Arc<dyn RecordStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: Arc<dyn RecordStore>) -> Router {
        let record_state = Arc::new(RecordState::new(store));

        // Answers every OPTIONS request with 200 and an empty body
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        let api = Router::new()
            .merge(record_routes(record_state))
            .merge(health_routes())
            .fallback(api_not_found);

        Router::new()
            .nest("/api", api)
            // Everything outside /api is a static file
            .fallback_service(ServeDir::new(&config.static_dir))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(from_fn(log_requests))
            .layer(from_fn(cors_headers))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Print where the service can be reached
    pub fn print_banner(&self, data_file: &Path) {
        let rule = "=".repeat(50);
        println!();
        println!("{}", rule);
        println!("  drillscore - server started");
        println!("{}", rule);
        println!();
        println!("[OK] Local:     http://localhost:{}", self.config.port);
        println!("[OK] Data file: {}", data_file.display());
        println!();
        println!("[INFO] Other devices on the network:");
        println!("   {}", self.config.network_url(local_ip()));
        println!();
        println!("Press Ctrl+C to stop the server");
        println!("{}", rule);
        println!();
    }

    /// Start the HTTP server and run until Ctrl+C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;

        Logger::info("SERVER_STARTED", &[("addr", &addr.to_string())]);

        if self.config.open_browser {
            open_browser_later(self.config.local_url());
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::info("SERVER_STOPPED", &[]);
        Ok(())
    }
}

async fn api_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
