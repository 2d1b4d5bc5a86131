//! Per-day counting of records over a calendar range.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::calendar::{day_key, CalendarRange};
use crate::models::Record;

/// Occurrence count for every day of a range.
///
/// The key set is fixed when the value is created and always covers the
/// whole range; counting never adds or removes days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCounts {
    counts: BTreeMap<NaiveDate, u32>,
}

impl DayCounts {
    /// All days of `range` set to zero.
    pub fn zeroed(range: &CalendarRange) -> Self {
        Self {
            counts: range.days().map(|day| (day, 0)).collect(),
        }
    }

    /// Count a day if it is tracked. Returns whether it was.
    pub fn increment(&mut self, day: NaiveDate) -> bool {
        match self.counts.get_mut(&day) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, day: NaiveDate) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }

    /// Count by canonical `YYYY-MM-DD` key.
    pub fn get_key(&self, key: &str) -> Option<u32> {
        NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .ok()
            .and_then(|day| self.counts.get(&day).copied())
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.counts.iter().map(|(&day, &count)| (day, count))
    }

    /// Counts keyed by `YYYY-MM-DD`.
    pub fn to_keyed(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(day, count)| (day_key(day), count)).collect()
    }
}

/// Count records per day over `range`.
///
/// Records without a parseable date and records outside the range are
/// skipped. The result does not depend on record order.
pub fn aggregate<'a, I>(records: I, range: &CalendarRange) -> DayCounts
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts = DayCounts::zeroed(range);
    for record in records {
        if let Some(day) = record.day() {
            counts.increment(day);
        }
    }
    counts
}
