//! Read queries for the `users` and `events` relations.

use chrono::{DateTime, NaiveDate};
use clickhouse::Row;
use metrics_core::schema::ObservedColumn;
use metrics_core::{Error, Event, Result, User};
use serde::Deserialize;

use crate::client::ClickHouseClient;
use crate::schema::parse_column_type;

const BACKEND: &str = "clickhouse";

// Every selected expression must be non-nullable unless the row field is an
// `Option`: a `Nullable` column carries a null-marker byte in RowBinary.
const USERS_QUERY: &str = "SELECT ifNull(toString(user_id), '') AS user_id, \
            toString(toDate(assumeNotNull(signup_date))) AS signup_date, \
            ifNull(toString(plan), '') AS plan, \
            ifNull(toString(country), '') AS country \
     FROM users \
     WHERE signup_date IS NOT NULL";

const EVENTS_QUERY: &str = "SELECT ifNull(toString(event_id), '') AS event_id, \
            ifNull(toString(user_id), '') AS user_id, \
            toUnixTimestamp64Milli(toDateTime64(assumeNotNull(timestamp), 3)) AS timestamp_ms, \
            CAST(feature, 'Nullable(String)') AS feature, \
            CAST(session_duration, 'Nullable(Float64)') AS session_duration \
     FROM events \
     WHERE timestamp IS NOT NULL";

/// User row as selected from ClickHouse.
#[derive(Debug, Clone, Row, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub signup_date: String,
    pub plan: String,
    pub country: String,
}

impl UserRow {
    pub fn into_user(self) -> Result<User> {
        let signup_date = NaiveDate::parse_from_str(&self.signup_date, "%Y-%m-%d").map_err(|e| {
            Error::schema(
                "users",
                "signup_date",
                format!("unparseable date '{}': {}", self.signup_date, e),
            )
        })?;
        Ok(User::new(self.user_id, signup_date, self.plan, self.country))
    }
}

/// Event row as selected from ClickHouse.
#[derive(Debug, Clone, Row, Deserialize)]
pub struct EventRow {
    pub event_id: String,
    pub user_id: String,
    /// Milliseconds since epoch
    pub timestamp_ms: i64,
    pub feature: Option<String>,
    pub session_duration: Option<f64>,
}

impl EventRow {
    pub fn into_event(self) -> Result<Event> {
        let timestamp = DateTime::from_timestamp_millis(self.timestamp_ms).ok_or_else(|| {
            Error::schema(
                "events",
                "timestamp",
                format!("timestamp {}ms out of range", self.timestamp_ms),
            )
        })?;
        let mut event = Event::new(self.event_id, self.user_id, timestamp)
            .with_session_duration(self.session_duration);
        event.feature = self.feature;
        Ok(event)
    }
}

#[derive(Debug, Clone, Row, Deserialize)]
struct ColumnRow {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

/// Columns of `table` in the client's database, as reported by
/// `system.columns`.
pub async fn describe_table(client: &ClickHouseClient, table: &str) -> Result<Vec<ObservedColumn>> {
    let rows: Vec<ColumnRow> = client
        .inner()
        .query("SELECT name, type FROM system.columns WHERE database = ? AND table = ? ORDER BY position")
        .bind(client.config().database.as_str())
        .bind(table)
        .fetch_all()
        .await
        .map_err(|e| Error::storage(BACKEND, format!("Query error: {}", e)))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let (kind, nullable) = parse_column_type(&row.type_name);
            ObservedColumn {
                name: row.name,
                kind,
                nullable,
            }
        })
        .collect())
}

/// Fetch all users. Null text columns come back empty and are dropped
/// during snapshot cleaning.
pub async fn fetch_users(client: &ClickHouseClient) -> Result<Vec<User>> {
    let rows: Vec<UserRow> = client
        .inner()
        .query(USERS_QUERY)
        .fetch_all()
        .await
        .map_err(|e| Error::storage(BACKEND, format!("Query error: {}", e)))?;

    rows.into_iter().map(UserRow::into_user).collect()
}

/// Fetch all events with non-null timestamps.
pub async fn fetch_events(client: &ClickHouseClient) -> Result<Vec<Event>> {
    let rows: Vec<EventRow> = client
        .inner()
        .query(EVENTS_QUERY)
        .fetch_all()
        .await
        .map_err(|e| Error::storage(BACKEND, format!("Query error: {}", e)))?;

    rows.into_iter().map(EventRow::into_event).collect()
}

/// Count rows in a table (for logging).
pub async fn count_rows(client: &ClickHouseClient, table: &str) -> Result<u64> {
    let count: u64 = client
        .inner()
        .query(&format!("SELECT count() FROM {}", table))
        .fetch_one()
        .await
        .map_err(|e| Error::storage(BACKEND, format!("Query error: {}", e)))?;
    Ok(count)
}
