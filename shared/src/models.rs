//! Shared data models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A database row reduced to the one field the heatmap cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Page id in the source database
    pub id: String,
    /// Raw `start` value of the configured date property
    pub date: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, date: Option<&str>) -> Self {
        Self {
            id: id.into(),
            date: date.map(String::from),
        }
    }

    /// Calendar day of this record, truncated from a timestamp if needed.
    ///
    /// Returns `None` when the date is absent or unparseable.
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_day)
    }
}

/// Parse a date or timestamp into the calendar day it was written for.
///
/// Timestamps keep their own local date; the offset is not applied.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local().date());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// One page of records returned by a record source.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}
