//! Active users metrics (DAU, MAU)
//!
//! Counts distinct users with at least one event per calendar day or month.
//! Orphan events count: activity is measured on events alone.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use metrics_core::{percentage, YearMonth};
use serde::Serialize;
use tracing::debug;

use crate::MetricsEngine;

/// Distinct active users on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActiveUsers {
    pub date: NaiveDate,
    pub active_users: u64,
}

/// Distinct active users in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyActiveUsers {
    pub month: YearMonth,
    pub active_users: u64,
}

impl MetricsEngine {
    /// DAU ordered by date ascending.
    ///
    /// Sparse: dates without events have no row. Use [`densify_daily`] for
    /// a continuous series.
    pub fn daily_active_users(&self) -> Vec<DailyActiveUsers> {
        let mut by_date: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
        for event in self.snapshot().events() {
            by_date
                .entry(self.zone().date_of(event.timestamp))
                .or_default()
                .insert(event.user_id.as_str());
        }

        let rows: Vec<_> = by_date
            .into_iter()
            .map(|(date, users)| DailyActiveUsers {
                date,
                active_users: users.len() as u64,
            })
            .collect();

        debug!(rows = rows.len(), "Computed daily active users");
        rows
    }

    /// MAU ordered by month ascending.
    ///
    /// Counted directly from events in a single pass; summing DAU rows would
    /// count a user once per active day.
    pub fn monthly_active_users(&self) -> Vec<MonthlyActiveUsers> {
        let mut by_month: BTreeMap<YearMonth, HashSet<&str>> = BTreeMap::new();
        for event in self.snapshot().events() {
            by_month
                .entry(self.zone().month_of(event.timestamp))
                .or_default()
                .insert(event.user_id.as_str());
        }

        let rows: Vec<_> = by_month
            .into_iter()
            .map(|(month, users)| MonthlyActiveUsers {
                month,
                active_users: users.len() as u64,
            })
            .collect();

        debug!(rows = rows.len(), "Computed monthly active users");
        rows
    }

    /// Latest DAU as a percentage of latest MAU, or `None` without events.
    pub fn stickiness(&self) -> Option<f64> {
        let dau = self.daily_active_users().last()?.active_users;
        let mau = self.monthly_active_users().last()?.active_users;
        percentage(dau, mau)
    }
}

/// Fills every missing date between the first and last row with zero.
pub fn densify_daily(rows: &[DailyActiveUsers]) -> Vec<DailyActiveUsers> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };

    let counts: BTreeMap<NaiveDate, u64> = rows.iter().map(|r| (r.date, r.active_users)).collect();

    first
        .date
        .iter_days()
        .take_while(|date| *date <= last.date)
        .map(|date| DailyActiveUsers {
            date,
            active_users: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
