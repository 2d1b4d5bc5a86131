//! Calendar ranges and day keys.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::{Error, Result};

/// Canonical `YYYY-MM-DD` key for a day.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Inclusive range of days inside a single calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl CalendarRange {
    /// Create a range, rejecting reversed bounds and ranges crossing a year.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Validation(format!(
                "range start {} is after end {}",
                start, end
            )));
        }
        if start.year() != end.year() {
            return Err(Error::Validation(format!(
                "range {}..{} spans more than one calendar year",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn full_year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| Error::Validation(format!("year {} out of range", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| Error::Validation(format!("year {} out of range", year)))?;
        Self::new(start, end)
    }

    /// January 1st of `today`'s year through `today`.
    pub fn year_to_date(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Calendar year the range belongs to.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// Number of days in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day from start to end, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Offset of `day` from the range start, if it lies inside the range.
    pub fn index_of(&self, day: NaiveDate) -> Option<usize> {
        self.contains(day)
            .then(|| (day - self.start).num_days() as usize)
    }

    /// Weekday of the day `offset` days after the start.
    pub fn weekday_at(&self, offset: usize) -> Weekday {
        (self.start + Duration::days(offset as i64)).weekday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_key_format() {
        assert_eq!(day_key(day(2024, 1, 7)), "2024-01-07");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn test_range_validation() {
        assert!(CalendarRange::new(day(2024, 1, 2), day(2024, 1, 1)).is_err());
        assert!(CalendarRange::new(day(2024, 12, 1), day(2025, 1, 1)).is_err());
        assert!(CalendarRange::new(day(2024, 1, 1), day(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_full_year_lengths() {
        assert_eq!(CalendarRange::full_year(2024).unwrap().len(), 366);
        assert_eq!(CalendarRange::full_year(2023).unwrap().len(), 365);
    }

    #[test]
    fn test_year_to_date() {
        let range = CalendarRange::year_to_date(day(2024, 3, 1));
        assert_eq!(range.start(), day(2024, 1, 1));
        assert_eq!(range.end(), day(2024, 3, 1));
        assert_eq!(range.len(), 61);
        assert_eq!(range.days().count(), 61);
    }

    #[test]
    fn test_index_and_weekday() {
        let range = CalendarRange::full_year(2024).unwrap();
        assert_eq!(range.index_of(day(2024, 1, 8)), Some(7));
        assert_eq!(range.index_of(day(2025, 1, 1)), None);
        // 2024-01-01 was a Monday
        assert_eq!(range.weekday_at(0), Weekday::Mon);
        assert_eq!(range.weekday_at(6), Weekday::Sun);
    }
}
