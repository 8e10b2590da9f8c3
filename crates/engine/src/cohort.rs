//! Signup cohort activity matrix.
//!
//! Cohorts here are signup months from `users`, unlike retention, which
//! groups by the month of the first event.

use std::collections::{BTreeMap, HashMap, HashSet};

use metrics_core::YearMonth;
use serde::Serialize;
use tracing::debug;

use crate::MetricsEngine;

/// Distinct active users of a signup cohort in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortActivity {
    pub cohort: YearMonth,
    pub activity_month: YearMonth,
    pub active_users: u64,
}

impl MetricsEngine {
    /// Active users per (signup cohort, activity month), ordered by cohort
    /// then month. Pairs without activity are omitted; orphan events are
    /// ignored.
    pub fn cohort_activity_matrix(&self) -> Vec<CohortActivity> {
        let cohorts: HashMap<&str, YearMonth> = self
            .snapshot()
            .users()
            .iter()
            .map(|u| (u.user_id.as_str(), YearMonth::from_date(u.signup_date)))
            .collect();

        let mut cells: BTreeMap<(YearMonth, YearMonth), HashSet<&str>> = BTreeMap::new();
        for event in self.snapshot().events() {
            let Some(cohort) = cohorts.get(event.user_id.as_str()) else {
                continue;
            };
            cells
                .entry((*cohort, self.zone().month_of(event.timestamp)))
                .or_default()
                .insert(event.user_id.as_str());
        }

        let rows: Vec<_> = cells
            .into_iter()
            .map(|((cohort, activity_month), users)| CohortActivity {
                cohort,
                activity_month,
                active_users: users.len() as u64,
            })
            .collect();

        debug!(cells = rows.len(), "Computed cohort activity matrix");
        rows
    }
}
