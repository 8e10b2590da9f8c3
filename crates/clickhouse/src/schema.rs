//! ClickHouse table schemas and column type mapping.
//!
//! Tables live in the client's default database:
//! - LowCardinality for plan, country and feature labels
//! - DateTime64(3) for millisecond event timestamps
//! - Events partitioned by month

use metrics_core::schema::ColumnKind;

/// SQL for creating the users table.
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id String,
    signup_date Date,
    plan LowCardinality(String),
    country LowCardinality(String)
)
ENGINE = ReplacingMergeTree()
ORDER BY user_id
"#;

/// SQL for creating the events table.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    event_id String,
    user_id String,
    timestamp DateTime64(3),
    feature LowCardinality(Nullable(String)),
    session_duration Nullable(Float64)
)
ENGINE = MergeTree()
PARTITION BY toYYYYMM(timestamp)
ORDER BY (user_id, timestamp, event_id)
SETTINGS index_granularity = 8192
"#;

/// SQL for creating the database.
pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", database)
}

/// Table creation statements, in dependency order.
pub fn all_tables() -> Vec<&'static str> {
    vec![CREATE_USERS_TABLE, CREATE_EVENTS_TABLE]
}

/// Maps a ClickHouse type name to the engine's column kind.
///
/// Returns the kind (or `None` for unsupported types) and whether the
/// column is nullable. `LowCardinality` and `Nullable` wrappers are peeled.
pub fn parse_column_type(type_name: &str) -> (Option<ColumnKind>, bool) {
    let mut name = type_name.trim();
    let mut nullable = false;

    loop {
        if let Some(inner) = unwrap_type(name, "Nullable") {
            nullable = true;
            name = inner;
        } else if let Some(inner) = unwrap_type(name, "LowCardinality") {
            name = inner;
        } else {
            break;
        }
    }

    let base = name.split('(').next().unwrap_or(name);
    let kind = match base {
        "String" | "FixedString" | "UUID" => Some(ColumnKind::Text),
        "Date" | "Date32" => Some(ColumnKind::Date),
        "DateTime" | "DateTime64" => Some(ColumnKind::Timestamp),
        "Float32" | "Float64" | "Decimal" | "Decimal32" | "Decimal64" | "Decimal128" => {
            Some(ColumnKind::Float)
        }
        b if b.starts_with("Int") || b.starts_with("UInt") => Some(ColumnKind::Float),
        _ => None,
    };

    (kind, nullable)
}

fn unwrap_type<'a>(name: &'a str, wrapper: &str) -> Option<&'a str> {
    name.strip_prefix(wrapper)?
        .strip_prefix('(')?
        .strip_suffix(')')
}
