//! Observability for drillscore
//!
//! Structured JSON logging, one event per line. Used for the request log,
//! store warnings (fail-open loads in particular) and server lifecycle.
//!
//! ```ignore
//! use drillscore::observability::Logger;
//!
//! Logger::info("RECORD_ADDED", &[("id", "7")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
