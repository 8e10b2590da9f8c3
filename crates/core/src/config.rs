//! Metrics configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::ReportingZone;
use crate::error::{Error, Result};

/// Engagement level cut-offs on a user's total event count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementThresholds {
    /// Strictly more events than this is High
    #[serde(default = "default_high_threshold")]
    pub high: i64,
    /// Strictly more events than this (and not High) is Medium
    #[serde(default = "default_medium_threshold")]
    pub medium: i64,
}

fn default_high_threshold() -> i64 {
    100
}

fn default_medium_threshold() -> i64 {
    20
}

impl Default for EngagementThresholds {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

impl EngagementThresholds {
    pub fn new(high: i64, medium: i64) -> Self {
        Self { high, medium }
    }

    pub fn validate(&self) -> Result<()> {
        if self.medium < 0 {
            return Err(Error::invalid_parameter(
                "engagement.medium",
                self.medium,
                "must be >= 0",
            ));
        }
        if self.high < self.medium {
            return Err(Error::invalid_parameter(
                "engagement.high",
                self.high,
                format!("must be >= engagement.medium ({})", self.medium),
            ));
        }
        Ok(())
    }
}

/// Metrics engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Days after first activity that count as a return
    #[serde(default = "default_retention_window_days")]
    pub retention_window_days: i64,
    /// Inactivity longer than this many days is churn
    #[serde(default = "default_churn_inactive_days")]
    pub churn_inactive_days: i64,
    /// Churn reference date; latest observed event date when unset
    #[serde(default)]
    pub churn_as_of: Option<NaiveDate>,
    #[serde(default)]
    pub engagement: EngagementThresholds,
    /// Reporting time zone as minutes east of UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_retention_window_days() -> i64 {
    7
}

fn default_churn_inactive_days() -> i64 {
    30
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            retention_window_days: default_retention_window_days(),
            churn_inactive_days: default_churn_inactive_days(),
            churn_as_of: None,
            engagement: EngagementThresholds::default(),
            utc_offset_minutes: 0,
        }
    }
}

impl MetricsConfig {
    /// Checks every parameter before any aggregation runs.
    pub fn validate(&self) -> Result<()> {
        validate_days("retention_window_days", self.retention_window_days)?;
        validate_days("churn_inactive_days", self.churn_inactive_days)?;
        self.engagement.validate()?;
        self.reporting_zone()?;
        Ok(())
    }

    pub fn reporting_zone(&self) -> Result<ReportingZone> {
        ReportingZone::from_offset_minutes(self.utc_offset_minutes)
    }
}

/// Rejects negative day counts.
pub fn validate_days(name: &'static str, days: i64) -> Result<()> {
    if days < 0 {
        return Err(Error::invalid_parameter(name, days, "must be >= 0"));
    }
    Ok(())
}
