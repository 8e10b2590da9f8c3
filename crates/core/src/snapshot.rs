//! Immutable, cleaned snapshot of the input relations.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{info, warn};
use validator::Validate;

use crate::calendar::ReportingZone;
use crate::error::Result;
use crate::model::{Event, User};
use crate::store::DataStore;

/// Rows dropped while cleaning a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub duplicate_users: usize,
    pub invalid_users: usize,
    pub duplicate_events: usize,
    pub invalid_events: usize,
}

impl CleaningStats {
    pub fn total_dropped(&self) -> usize {
        self.duplicate_users + self.invalid_users + self.duplicate_events + self.invalid_events
    }
}

/// Users and events as read once from a store, deduplicated and validated.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    users: Vec<User>,
    events: Vec<Event>,
    stats: CleaningStats,
}

impl Snapshot {
    /// Reads both relations from `store` and cleans them.
    ///
    /// Any store error is returned as-is; the snapshot is never partial.
    pub async fn load(store: &dyn DataStore) -> Result<Self> {
        let users = store.all_users().await?;
        let events = store.all_events().await?;

        info!(
            backend = store.name(),
            users = users.len(),
            events = events.len(),
            "Read input relations"
        );

        Ok(Self::from_rows(users, events))
    }

    /// Cleans raw rows: first occurrence of each ID wins, rows failing
    /// validation are dropped.
    pub fn from_rows(users: Vec<User>, events: Vec<Event>) -> Self {
        let mut stats = CleaningStats::default();

        let mut seen = HashSet::with_capacity(users.len());
        let mut clean_users = Vec::with_capacity(users.len());
        for user in users {
            if user.validate().is_err() {
                stats.invalid_users += 1;
                continue;
            }
            if !seen.insert(user.user_id.clone()) {
                stats.duplicate_users += 1;
                continue;
            }
            clean_users.push(user);
        }

        let mut seen = HashSet::with_capacity(events.len());
        let mut clean_events = Vec::with_capacity(events.len());
        for event in events {
            if event.validate().is_err() || !event.session_duration.is_finite() {
                stats.invalid_events += 1;
                continue;
            }
            if !seen.insert(event.event_id.clone()) {
                stats.duplicate_events += 1;
                continue;
            }
            clean_events.push(event);
        }

        if stats.total_dropped() > 0 {
            warn!(
                duplicate_users = stats.duplicate_users,
                invalid_users = stats.invalid_users,
                duplicate_events = stats.duplicate_events,
                invalid_events = stats.invalid_events,
                "Dropped rows while cleaning snapshot"
            );
        }

        Self {
            users: clean_users,
            events: clean_events,
            stats,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn stats(&self) -> CleaningStats {
        self.stats
    }

    /// Latest event date in `zone`, or `None` without events.
    pub fn max_event_date(&self, zone: ReportingZone) -> Option<NaiveDate> {
        self.events.iter().map(|e| zone.date_of(e.timestamp)).max()
    }
}
