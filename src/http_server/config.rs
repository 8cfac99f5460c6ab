//! HTTP Server Configuration
//!
//! Bind address, static file root, and the browser convenience settings.

use std::net::IpAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root for non-API GET requests (default: working directory)
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Page opened in the browser on startup, relative to `static_dir`
    #[serde(default = "default_landing_page")]
    pub landing_page: String,

    /// Open the landing page in a local browser after startup
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_landing_page() -> String {
    "index.html".to_string()
}

fn default_open_browser() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            landing_page: default_landing_page(),
            open_browser: default_open_browser(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Landing page URL on this machine
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}/{}", self.port, self.landing_page)
    }

    /// Landing page URL for other devices on the network
    pub fn network_url(&self, ip: IpAddr) -> String {
        format!("http://{}:{}/{}", ip, self.port, self.landing_page)
    }
}
