//! N-day retention by first-activity cohort.
//!
//! A user's cohort is the month of their earliest event date. The user is
//! retained when they have an event on exactly `first_date + window_days`;
//! activity on any other day inside the window does not count.

use std::collections::BTreeMap;

use chrono::Days;
use metrics_core::{percentage, validate_days, Result, YearMonth};
use serde::Serialize;
use tracing::debug;

use crate::activity::index_by_user;
use crate::MetricsEngine;

/// Retention of one first-activity cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortRetention {
    pub cohort: YearMonth,
    pub total_users: u64,
    pub retained_users: u64,
    /// Percentage of the cohort retained, 2 decimals
    pub retention_rate: f64,
}

impl MetricsEngine {
    /// Retention per cohort, ordered by cohort ascending.
    ///
    /// Works on events alone, so users without a row in `users` still form
    /// cohorts. Empty input gives an empty result.
    pub fn retention_by_cohort(&self, window_days: i64) -> Result<Vec<CohortRetention>> {
        validate_days("window_days", window_days)?;
        let window = Days::new(window_days as u64);

        let mut cohorts: BTreeMap<YearMonth, (u64, u64)> = BTreeMap::new();
        for activity in index_by_user(self.snapshot().events(), self.zone()).values() {
            let Some(first) = activity.first_date() else {
                continue;
            };
            let returned = first
                .checked_add_days(window)
                .is_some_and(|target| activity.dates.contains(&target));

            let (total, retained) = cohorts.entry(YearMonth::from_date(first)).or_default();
            *total += 1;
            if returned {
                *retained += 1;
            }
        }

        let rows: Vec<_> = cohorts
            .into_iter()
            .filter_map(|(cohort, (total, retained))| {
                Some(CohortRetention {
                    cohort,
                    total_users: total,
                    retained_users: retained,
                    retention_rate: percentage(retained, total)?,
                })
            })
            .collect();

        debug!(window_days, cohorts = rows.len(), "Computed cohort retention");
        Ok(rows)
    }
}
