//! Per-user event index shared by the user-level metrics.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use metrics_core::{Event, ReportingZone};

/// Everything the engine needs to know about one user's events.
#[derive(Debug, Clone, Default)]
pub(crate) struct UserActivity<'a> {
    pub event_count: u64,
    pub dates: BTreeSet<NaiveDate>,
    pub features: HashSet<&'a str>,
    pub duration_sum: f64,
}

impl UserActivity<'_> {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn avg_duration(&self) -> f64 {
        if self.event_count == 0 {
            return 0.0;
        }
        self.duration_sum / self.event_count as f64
    }
}

/// Groups events by `user_id`. Orphan events get an entry too; callers
/// that join against users filter them out.
pub(crate) fn index_by_user<'a>(
    events: &'a [Event],
    zone: ReportingZone,
) -> HashMap<&'a str, UserActivity<'a>> {
    let mut index: HashMap<&str, UserActivity> = HashMap::new();
    for event in events {
        let entry = index.entry(event.user_id.as_str()).or_default();
        entry.event_count += 1;
        entry.dates.insert(zone.date_of(event.timestamp));
        if let Some(feature) = event.feature.as_deref() {
            entry.features.insert(feature);
        }
        entry.duration_sum += event.session_duration;
    }
    index
}
