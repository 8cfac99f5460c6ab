//! CLI argument definitions using clap
//!
//! Commands:
//! - drillscore init [--data-dir <path>]
//! - drillscore serve [--config <path>] [--port <port>] ...
//! - drillscore stats [--data-dir <path>] [--role <role>] [--username <name>]
//!
//! With no command, `serve` runs with defaults.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// drillscore - scored sales roleplay session records over HTTP
#[derive(Parser, Debug)]
#[command(name = "drillscore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty dataset
    Init {
        /// Directory holding records.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Start the HTTP server
    Serve(ServeArgs),

    /// Print statistics as JSON and exit
    Stats {
        /// Directory holding records.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Set to "leader" to restrict to one team leader
        #[arg(long)]
        role: Option<String>,

        /// Team leader name used with --role leader
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding records.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory served for non-API requests
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Do not open a browser on startup
    #[arg(long)]
    pub no_browser: bool,

    /// Fail requests instead of serving an empty dataset when records.json is unreadable
    #[arg(long)]
    pub strict_load: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
