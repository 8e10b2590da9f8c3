//! Core types for the product metrics engine: the `users` and `events`
//! relations, the store that serves them, configuration and errors.

pub mod calendar;
pub mod config;
pub mod error;
pub mod model;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use calendar::{percentage, round2, ReportingZone, YearMonth};
pub use config::{validate_days, EngagementThresholds, MetricsConfig};
pub use error::{Error, Result};
pub use model::*;
pub use snapshot::{CleaningStats, Snapshot};
pub use store::{DataStore, MemoryStore};
