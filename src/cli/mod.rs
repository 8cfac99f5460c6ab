//! CLI module for drillscore
//!
//! - init: create the data directory and an empty dataset
//! - serve: run the HTTP server (default when no command is given)
//! - stats: one-shot statistics

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{init, run, run_command, serve, stats};
pub use config::{Config, PORT_ENV, RENDER_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
