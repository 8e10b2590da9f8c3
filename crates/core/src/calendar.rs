//! Calendar bucketing: reporting time zone, day and month keys.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Largest accepted reporting offset, just under one day.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Fixed-offset time zone used to truncate timestamps to calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingZone {
    offset: FixedOffset,
}

impl ReportingZone {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Creates a zone `minutes` east of UTC.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        if minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
            return Err(Error::invalid_parameter(
                "utc_offset_minutes",
                minutes,
                format!("must be within +/-{}", MAX_UTC_OFFSET_MINUTES),
            ));
        }
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            Error::invalid_parameter("utc_offset_minutes", minutes, "not a valid offset")
        })?;
        Ok(Self { offset })
    }

    /// Calendar date of `ts` in this zone.
    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Calendar month of `ts` in this zone.
    pub fn month_of(&self, ts: DateTime<Utc>) -> YearMonth {
        YearMonth::from_date(self.date_of(ts))
    }
}

impl Default for ReportingZone {
    fn default() -> Self {
        Self::utc()
    }
}

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rounds to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `100 * part / whole` rounded to 2 decimals, or `None` when `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(round2(100.0 * part as f64 / whole as f64))
}
