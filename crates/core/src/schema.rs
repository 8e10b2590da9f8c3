//! Column contracts for the `users` and `events` relations.
//!
//! Stores that read from an untyped backing check the columns they find
//! against these lists before fetching rows.

use tracing::debug;

use crate::error::{Error, Result};

/// Logical column types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Date,
    Timestamp,
    Float,
}

impl ColumnKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Float => "float",
        }
    }
}

/// A required column and whether it may hold nulls.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

const fn column(name: &'static str, kind: ColumnKind, nullable: bool) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        nullable,
    }
}

pub const USERS_TABLE: &str = "users";
pub const EVENTS_TABLE: &str = "events";

pub const USERS_COLUMNS: &[ColumnSpec] = &[
    column("user_id", ColumnKind::Text, false),
    column("signup_date", ColumnKind::Date, false),
    column("plan", ColumnKind::Text, false),
    column("country", ColumnKind::Text, false),
];

pub const EVENTS_COLUMNS: &[ColumnSpec] = &[
    column("event_id", ColumnKind::Text, false),
    column("user_id", ColumnKind::Text, false),
    column("timestamp", ColumnKind::Timestamp, false),
    column("feature", ColumnKind::Text, true),
    column("session_duration", ColumnKind::Float, true),
];

/// A column as reported by the backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedColumn {
    pub name: String,
    pub kind: Option<ColumnKind>,
    pub nullable: bool,
}

/// Verifies that every required column is present with a compatible type.
///
/// Extra columns are ignored. A nullable column where the contract wants a
/// non-null one is accepted; the store must skip or default its null rows.
pub fn check_columns(table: &str, required: &[ColumnSpec], observed: &[ObservedColumn]) -> Result<()> {
    for wanted in required {
        let found = observed
            .iter()
            .find(|c| c.name == wanted.name)
            .ok_or_else(|| Error::schema(table, wanted.name, "column not found"))?;

        if found.nullable && !wanted.nullable {
            debug!(
                table,
                column = wanted.name,
                "Nullable column where non-null is expected; null rows will be skipped"
            );
        }

        match found.kind {
            Some(kind) if kind == wanted.kind => {}
            // Dates are readable where timestamps are expected and vice versa
            Some(ColumnKind::Date) if wanted.kind == ColumnKind::Timestamp => {}
            Some(ColumnKind::Timestamp) if wanted.kind == ColumnKind::Date => {}
            Some(kind) => {
                return Err(Error::schema(
                    table,
                    wanted.name,
                    format!("expected {}, found {}", wanted.kind.describe(), kind.describe()),
                ));
            }
            None => {
                return Err(Error::schema(
                    table,
                    wanted.name,
                    format!("expected {}, found unsupported type", wanted.kind.describe()),
                ));
            }
        }
    }
    Ok(())
}
