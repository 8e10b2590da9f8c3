//! Per-plan aggregates: inactivity churn and plan distribution.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use metrics_core::{percentage, validate_days, Result};
use serde::Serialize;
use tracing::debug;

use crate::activity::index_by_user;
use crate::MetricsEngine;

/// Churn among one plan's active-at-least-once users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanChurn {
    pub plan: String,
    /// Users on this plan with at least one event
    pub total_users: u64,
    pub churned: u64,
    /// Percentage churned, 2 decimals
    pub churn_rate: f64,
}

/// Share of all users on one plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanShare {
    pub plan: String,
    pub users: u64,
    /// Percentage of all users, 2 decimals
    pub share: f64,
}

impl MetricsEngine {
    /// Churn per plan as of `as_of`, ordered by plan.
    ///
    /// A user is churned when `as_of - last_activity_date` exceeds
    /// `inactive_days` whole days. Users with no events have no last
    /// activity and are left out of both `total_users` and `churned`, so
    /// `total_users` can be smaller than the plan's population. Orphan
    /// events are ignored. Plans with no qualifying user have no row.
    pub fn churn_by_plan(&self, inactive_days: i64, as_of: NaiveDate) -> Result<Vec<PlanChurn>> {
        validate_days("inactive_days", inactive_days)?;

        let activity = index_by_user(self.snapshot().events(), self.zone());

        let mut plans: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for user in self.snapshot().users() {
            let Some(last) = activity
                .get(user.user_id.as_str())
                .and_then(|a| a.last_date())
            else {
                continue;
            };

            let days_inactive = (as_of - last).num_days();
            let (total, churned) = plans.entry(user.plan.as_str()).or_default();
            *total += 1;
            if days_inactive > inactive_days {
                *churned += 1;
            }
        }

        let rows: Vec<_> = plans
            .into_iter()
            .filter_map(|(plan, (total, churned))| {
                Some(PlanChurn {
                    plan: plan.to_string(),
                    total_users: total,
                    churned,
                    churn_rate: percentage(churned, total)?,
                })
            })
            .collect();

        debug!(
            inactive_days,
            %as_of,
            plans = rows.len(),
            "Computed churn by plan"
        );
        Ok(rows)
    }

    /// User count and share per plan over all users, ordered by plan.
    pub fn plan_distribution(&self) -> Vec<PlanShare> {
        let total = self.total_users();

        let mut plans: BTreeMap<&str, u64> = BTreeMap::new();
        for user in self.snapshot().users() {
            *plans.entry(user.plan.as_str()).or_default() += 1;
        }

        plans
            .into_iter()
            .map(|(plan, users)| PlanShare {
                plan: plan.to_string(),
                users,
                share: percentage(users, total).unwrap_or(0.0),
            })
            .collect()
    }
}
