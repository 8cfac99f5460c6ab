//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use super::args::{Cli, Command, ServeArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServer;
use crate::observability::Logger;
use crate::store::{FileRecordStore, LoadPolicy, RecordFilter, RecordStore, StoreConfig};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command.unwrap_or(Command::Serve(ServeArgs::default())))
}

/// Dispatch one command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { data_dir } => init(&data_dir),
        Command::Serve(args) => serve(&args),
        Command::Stats {
            data_dir,
            role,
            username,
        } => stats(&data_dir, RecordFilter { role, username }),
    }
}

/// Create the data directory and an empty dataset. Never overwrites.
pub fn init(data_dir: &Path) -> CliResult<()> {
    let config = StoreConfig {
        data_dir: data_dir.to_path_buf(),
        load_policy: LoadPolicy::Strict,
    };
    let store = FileRecordStore::open(&config);

    if store.ensure_initialized()? {
        println!("Initialized {}", store.path().display());
    } else {
        println!("Already initialized: {}", store.path().display());
    }
    Ok(())
}

/// Start the HTTP server
///
/// 1. Resolve configuration (file, environment, flags)
/// 2. Create the data directory and dataset if absent
/// 3. Serve until Ctrl+C
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    let config = Config::resolve(args)?;

    let store = FileRecordStore::open(&config.store);
    store
        .ensure_initialized()
        .map_err(|e| CliError::boot_failed(format!("Cannot prepare data directory: {}", e)))?;

    let data_file = std::fs::canonicalize(store.path()).unwrap_or_else(|_| store.path().to_path_buf());
    let server = HttpServer::new(config.server.clone(), Arc::new(store));
    server.print_banner(&data_file);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server.start().await.map_err(|e| {
            Logger::fatal("SERVER_FAILED", &[("reason", &e.to_string())]);
            CliError::boot_failed(format!("HTTP server failed: {}", e))
        })
    })
}

/// Print statistics for the dataset as JSON
pub fn stats(data_dir: &Path, filter: RecordFilter) -> CliResult<()> {
    let config = StoreConfig {
        data_dir: data_dir.to_path_buf(),
        load_policy: LoadPolicy::Strict,
    };
    let store = FileRecordStore::open(&config);

    let statistics = store.statistics(&filter)?;
    println!("{}", serde_json::to_string_pretty(&statistics)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_dataset() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");

        init(&data_dir).unwrap();
        let raw = std::fs::read_to_string(data_dir.join("records.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["nextId"], 1);
        assert_eq!(value["records"], serde_json::json!([]));

        // Second init leaves the file alone
        init(&data_dir).unwrap();
    }

    #[test]
    fn test_stats_on_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("records.json"), "garbage").unwrap();

        assert!(stats(dir.path(), RecordFilter::all()).is_err());
    }

    #[test]
    fn test_stats_on_missing_file_succeeds() {
        let dir = TempDir::new().unwrap();
        assert!(stats(dir.path(), RecordFilter::all()).is_ok());
    }
}
