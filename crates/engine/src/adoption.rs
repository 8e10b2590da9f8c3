//! Feature adoption.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use metrics_core::round2;
use serde::Serialize;
use tracing::debug;

use crate::MetricsEngine;

/// Usage of one feature across all events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAdoption {
    pub feature: String,
    pub total_uses: u64,
    pub unique_users: u64,
    /// Mean session duration, 2 decimals
    pub avg_duration: f64,
    /// Distinct dates the feature was used on
    pub days_active: u64,
}

#[derive(Default)]
struct FeatureAccumulator<'a> {
    uses: u64,
    users: HashSet<&'a str>,
    days: HashSet<NaiveDate>,
    duration_sum: f64,
}

impl MetricsEngine {
    /// Adoption per feature, most used first; ties by feature name.
    ///
    /// Events without a feature are skipped. Orphan events count.
    pub fn feature_adoption(&self) -> Vec<FeatureAdoption> {
        let mut features: HashMap<&str, FeatureAccumulator> = HashMap::new();
        for event in self.snapshot().events() {
            let Some(feature) = event.feature.as_deref() else {
                continue;
            };
            let acc = features.entry(feature).or_default();
            acc.uses += 1;
            acc.users.insert(event.user_id.as_str());
            acc.days.insert(self.zone().date_of(event.timestamp));
            acc.duration_sum += event.session_duration;
        }

        let mut rows: Vec<_> = features
            .into_iter()
            .map(|(feature, acc)| FeatureAdoption {
                feature: feature.to_string(),
                total_uses: acc.uses,
                unique_users: acc.users.len() as u64,
                avg_duration: round2(acc.duration_sum / acc.uses as f64),
                days_active: acc.days.len() as u64,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_uses
                .cmp(&a.total_uses)
                .then_with(|| a.feature.cmp(&b.feature))
        });

        debug!(features = rows.len(), "Computed feature adoption");
        rows
    }
}
