//! Per-user engagement segmentation.

use std::collections::BTreeMap;
use std::fmt;

use metrics_core::{round2, EngagementThresholds, Result};
use serde::Serialize;
use tracing::debug;

use crate::activity::{index_by_user, UserActivity};
use crate::MetricsEngine;

/// Engagement bucket derived from a user's total event count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EngagementLevel {
    High,
    Medium,
    Low,
}

impl EngagementLevel {
    /// Strictly above `high` is High, strictly above `medium` is Medium.
    pub fn classify(total_events: u64, thresholds: &EngagementThresholds) -> Self {
        let total = i64::try_from(total_events).unwrap_or(i64::MAX);
        if total > thresholds.high {
            Self::High
        } else if total > thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for EngagementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user's activity summary and engagement level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSegment {
    pub user_id: String,
    pub plan: String,
    pub country: String,
    pub total_events: u64,
    pub active_days: u64,
    /// Distinct non-null features used
    pub features_used: u64,
    /// Mean session duration, 2 decimals; 0 without events
    pub avg_session_duration: f64,
    pub engagement_level: EngagementLevel,
}

/// Number of users in one engagement level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementShare {
    pub level: EngagementLevel,
    pub users: u64,
}

impl MetricsEngine {
    /// Every user with their event aggregates, ordered by `user_id`.
    ///
    /// Users without events are kept with zero aggregates and level Low.
    /// Orphan events belong to no user and are ignored.
    pub fn user_segmentation(&self, thresholds: EngagementThresholds) -> Result<Vec<UserSegment>> {
        thresholds.validate()?;

        let activity = index_by_user(self.snapshot().events(), self.zone());
        let none = UserActivity::default();

        let mut rows: Vec<_> = self
            .snapshot()
            .users()
            .iter()
            .map(|user| {
                let a = activity.get(user.user_id.as_str()).unwrap_or(&none);
                UserSegment {
                    user_id: user.user_id.clone(),
                    plan: user.plan.clone(),
                    country: user.country.clone(),
                    total_events: a.event_count,
                    active_days: a.dates.len() as u64,
                    features_used: a.features.len() as u64,
                    avg_session_duration: round2(a.avg_duration()),
                    engagement_level: EngagementLevel::classify(a.event_count, &thresholds),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        debug!(users = rows.len(), "Computed user segmentation");
        Ok(rows)
    }

    /// User counts per engagement level, High first; empty levels omitted.
    pub fn engagement_distribution(
        &self,
        thresholds: EngagementThresholds,
    ) -> Result<Vec<EngagementShare>> {
        let mut levels: BTreeMap<EngagementLevel, u64> = BTreeMap::new();
        for segment in self.user_segmentation(thresholds)? {
            *levels.entry(segment.engagement_level).or_default() += 1;
        }

        Ok(levels
            .into_iter()
            .map(|(level, users)| EngagementShare { level, users })
            .collect())
    }
}
