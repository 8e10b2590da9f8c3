//! Logging setup for the product metrics binaries.
//!
//! Logs go to stderr so that reports printed on stdout stay machine-readable.

pub mod tracing_setup;

pub use tracing_setup::*;
