//! User and event relations consumed by the metrics engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered user. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    /// Unique user ID
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    /// Calendar date the user signed up
    pub signup_date: NaiveDate,
    /// Subscription plan (Free, Pro, Enterprise, ...)
    pub plan: String,
    /// Country label
    pub country: String,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        signup_date: NaiveDate,
        plan: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            signup_date,
            plan: plan.into(),
            country: country.into(),
        }
    }
}

/// A single product event. Immutable once ingested.
///
/// `user_id` may reference a user absent from the snapshot (orphan event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Event {
    /// Unique event ID
    #[validate(length(min = 1, max = 128))]
    pub event_id: String,
    /// Referenced user ID
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Feature label, if the event is attributed to one
    pub feature: Option<String>,
    /// Session duration; 0 when the source had none
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub session_duration: f64,
}

impl Event {
    /// Creates an event without a feature and with zero session duration.
    pub fn new(
        event_id: impl Into<String>,
        user_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            user_id: user_id.into(),
            timestamp,
            feature: None,
            session_duration: 0.0,
        }
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Sets the session duration; a missing source value maps to 0.
    pub fn with_session_duration(mut self, duration: Option<f64>) -> Self {
        self.session_duration = duration.unwrap_or(0.0);
        self
    }
}
