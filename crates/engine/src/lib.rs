//! Product metrics engine.
//!
//! Pure aggregations over a cleaned [`Snapshot`] of users and events:
//!
//! - **Active users**: DAU, MAU, dense daily series, stickiness
//! - **Retention**: strict N-day return rate per first-activity cohort
//! - **Churn**: inactivity-based churn per plan, plan distribution
//! - **Adoption**: per-feature usage
//! - **Segmentation**: per-user engagement levels
//! - **Cohorts**: signup-cohort x activity-month matrix
//!
//! # Usage
//!
//! ```ignore
//! use metrics_core::{MemoryStore, MetricsConfig, Snapshot};
//! use metrics_engine::MetricsEngine;
//!
//! let snapshot = Snapshot::load(&store).await?;
//! let engine = MetricsEngine::from_config(snapshot, &MetricsConfig::default())?;
//!
//! let dau = engine.daily_active_users();
//! let retention = engine.retention_by_cohort(7)?;
//! ```
//!
//! Every method is deterministic for a given snapshot; the engine holds no
//! other state.

pub mod active_users;
pub mod adoption;
pub mod churn;
pub mod cohort;
pub mod retention;
pub mod segmentation;

mod activity;

use chrono::NaiveDate;
use metrics_core::{MetricsConfig, ReportingZone, Result, Snapshot};

pub use active_users::{densify_daily, DailyActiveUsers, MonthlyActiveUsers};
pub use adoption::FeatureAdoption;
pub use churn::{PlanChurn, PlanShare};
pub use cohort::CohortActivity;
pub use retention::CohortRetention;
pub use segmentation::{EngagementLevel, EngagementShare, UserSegment};

/// Metrics engine over one immutable snapshot.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    snapshot: Snapshot,
    zone: ReportingZone,
}

impl MetricsEngine {
    pub fn new(snapshot: Snapshot, zone: ReportingZone) -> Self {
        Self { snapshot, zone }
    }

    /// Validates `config` and builds an engine in its reporting zone.
    pub fn from_config(snapshot: Snapshot, config: &MetricsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(snapshot, config.reporting_zone()?))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn zone(&self) -> ReportingZone {
        self.zone
    }

    pub fn total_users(&self) -> u64 {
        self.snapshot.users().len() as u64
    }

    /// All events, orphans included.
    pub fn total_events(&self) -> u64 {
        self.snapshot.events().len() as u64
    }

    /// Churn reference date: the explicit override, else the latest
    /// observed event date. `None` only when both are absent.
    pub fn resolve_as_of(&self, explicit: Option<NaiveDate>) -> Option<NaiveDate> {
        explicit.or_else(|| self.snapshot.max_event_date(self.zone))
    }
}
