//! Service configuration
//!
//! Precedence, lowest to highest: built-in defaults, `--config` JSON file,
//! environment (`PORT`, `RENDER`), command line flags.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::args::ServeArgs;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::store::{LoadPolicy, StoreConfig};

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Set to "true" on hosted deployments; disables the browser launch
pub const RENDER_ENV: &str = "RENDER";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("server.host must not be empty"));
        }
        if self.store.data_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("store.data_dir must not be empty"));
        }
        Ok(())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| {
                CliError::config_error(format!("{} must be a port number, got '{}'", PORT_ENV, port))
            })?;
        }

        if lookup(RENDER_ENV).as_deref() == Some("true") {
            self.server.open_browser = false;
        }

        Ok(())
    }

    /// Apply `serve` flags
    pub fn apply_args(&mut self, args: &ServeArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(dir) = &args.data_dir {
            self.store.data_dir = dir.clone();
        }
        if let Some(dir) = &args.static_dir {
            self.server.static_dir = dir.clone();
        }
        if args.no_browser {
            self.server.open_browser = false;
        }
        if args.strict_load {
            self.store.load_policy = LoadPolicy::Strict;
        }
    }

    /// Resolve the full configuration for `serve`
    pub fn resolve(args: &ServeArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_args(args);
        Ok(config)
    }
}
