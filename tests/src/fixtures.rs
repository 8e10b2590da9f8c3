//! Test fixtures: users, events and a small known dataset.

use chrono::{NaiveDate, TimeZone, Utc};
use metrics_core::{Event, User};
use uuid::Uuid;

/// Calendar date shorthand.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A user in the given plan and country.
pub fn user(user_id: &str, signup: NaiveDate, plan: &str, country: &str) -> User {
    User::new(user_id, signup, plan, country)
}

/// An event at noon UTC with a unique id.
pub fn event(user_id: &str, day: NaiveDate, feature: Option<&str>, secs: f64) -> Event {
    event_at(user_id, day, 12, 0, feature, secs)
}

/// An event at the given UTC time of day with a unique id.
pub fn event_at(
    user_id: &str,
    day: NaiveDate,
    hour: u32,
    minute: u32,
    feature: Option<&str>,
    secs: f64,
) -> Event {
    let ts = Utc.from_utc_datetime(&day.and_hms_opt(hour, minute, 0).unwrap());
    let mut event = Event::new(Uuid::new_v4().to_string(), user_id, ts)
        .with_session_duration(Some(secs));
    event.feature = feature.map(str::to_string);
    event
}

/// Five users across three plans. `erin` never shows up.
pub fn users() -> Vec<User> {
    vec![
        user("alice", date(2024, 1, 2), "Pro", "US"),
        user("bob", date(2024, 1, 5), "Free", "DE"),
        user("carol", date(2024, 1, 20), "Free", "US"),
        user("dave", date(2024, 2, 3), "Enterprise", "FR"),
        user("erin", date(2024, 2, 10), "Free", "US"),
    ]
}

/// Eleven events from January and February 2024, one from an unknown user.
pub fn events() -> Vec<Event> {
    vec![
        event("alice", date(2024, 1, 2), Some("search"), 30.0),
        event("alice", date(2024, 1, 9), Some("search"), 10.0),
        event("alice", date(2024, 2, 15), Some("export"), 20.0),
        event("bob", date(2024, 1, 5), Some("search"), 0.0),
        event("bob", date(2024, 1, 6), Some("dashboard"), 5.0),
        event("carol", date(2024, 1, 21), Some("dashboard"), 12.0),
        event("carol", date(2024, 1, 28), None, 8.0),
        event("dave", date(2024, 2, 4), Some("export"), 40.0),
        event("dave", date(2024, 2, 11), Some("export"), 10.0),
        event("dave", date(2024, 2, 15), Some("search"), 6.0),
        event("ghost", date(2024, 2, 15), Some("search"), 4.0),
    ]
}
