//! drillscore - record keeping for scored sales roleplay sessions
//!
//! Clients submit session records over HTTP, list and filter them, fetch
//! statistics and delete entries. The dataset lives in a single JSON file.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
