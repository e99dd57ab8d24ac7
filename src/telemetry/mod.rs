//! Logging infrastructure
//!
//! Structured logging with tracing; every module logs through the
//! `tracing` macros and the binary installs the subscriber once at startup.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogGuard};
