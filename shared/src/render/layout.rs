//! Day-to-cell placement for the supported calendar layouts.

use chrono::{Datelike, NaiveDate, Weekday};
use std::str::FromStr;

use crate::calendar::{days_in_month, CalendarRange};
use crate::Error;

/// Week columns needed to cover any single year.
pub const WEEK_COLUMNS: usize = 53;

/// Columns reserved for each month in the month-block layout.
pub const MONTH_BLOCK_WEEKS: usize = 5;

const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Geometric arrangement of days on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One column per seven days counted from the range start.
    #[default]
    WeekColumn,
    /// Twelve fixed-width month blocks with Sunday-first weekday rows.
    MonthBlock,
}

impl Layout {
    /// Total grid columns, independent of content.
    pub fn columns(self) -> usize {
        match self {
            Layout::WeekColumn => WEEK_COLUMNS,
            Layout::MonthBlock => 12 * MONTH_BLOCK_WEEKS,
        }
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weeks" | "week-column" => Ok(Layout::WeekColumn),
            "month" | "months" | "month-block" => Ok(Layout::MonthBlock),
            other => Err(Error::Validation(format!("unknown layout '{}'", other))),
        }
    }
}

/// What occupies a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Day(NaiveDate),
    /// Transparent filler with no count.
    Padding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub column: usize,
    pub row: usize,
    pub kind: CellKind,
}

/// First column occupied by a month, used for month labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStart {
    pub month: u32,
    pub column: usize,
}

/// Cell positions for a range under one layout.
#[derive(Debug, Clone)]
pub struct CalendarGrid {
    pub cells: Vec<GridCell>,
    pub month_starts: Vec<MonthStart>,
    /// Weekday shown on each row.
    pub row_weekdays: [Weekday; 7],
}

impl CalendarGrid {
    pub fn build(range: &CalendarRange, layout: Layout) -> Self {
        match layout {
            Layout::WeekColumn => Self::week_columns(range),
            Layout::MonthBlock => Self::month_blocks(range),
        }
    }

    /// Cells holding a day, in placement order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.iter().filter_map(|cell| match cell.kind {
            CellKind::Day(day) => Some(day),
            CellKind::Padding => None,
        })
    }

    fn week_columns(range: &CalendarRange) -> Self {
        let mut cells = Vec::with_capacity(range.len());
        let mut month_starts = Vec::new();

        for (index, day) in range.days().enumerate() {
            let column = index / 7;
            // One label per column; the earlier month keeps a shared column.
            let column_free = month_starts
                .last()
                .map_or(true, |last: &MonthStart| column > last.column);
            if column_free && (index == 0 || day.day() == 1) {
                month_starts.push(MonthStart {
                    month: day.month(),
                    column,
                });
            }
            cells.push(GridCell {
                column,
                row: index % 7,
                kind: CellKind::Day(day),
            });
        }

        let mut row_weekdays = SUNDAY_FIRST;
        for (row, weekday) in row_weekdays.iter_mut().enumerate() {
            *weekday = range.weekday_at(row);
        }

        Self {
            cells,
            month_starts,
            row_weekdays,
        }
    }

    fn month_blocks(range: &CalendarRange) -> Self {
        let year = range.year();
        let mut cells = Vec::with_capacity(12 * MONTH_BLOCK_WEEKS * 7);
        let mut month_starts = Vec::with_capacity(12);

        for month in 1..=12u32 {
            let base = (month as usize - 1) * MONTH_BLOCK_WEEKS;
            month_starts.push(MonthStart {
                month,
                column: base,
            });

            let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
                continue;
            };
            let offset = first.weekday().num_days_from_sunday() as usize;
            let total_days = days_in_month(year, month) as usize;
            let overflows = month_weeks(offset, total_days) > MONTH_BLOCK_WEEKS;

            for week in 0..MONTH_BLOCK_WEEKS {
                for row in 0..7 {
                    let slot = week * 7 + row;
                    let mut day_of_month = (slot + 1).checked_sub(offset);
                    // A sixth week folds back into the empty head of the block.
                    if week == 0 && overflows && day_of_month.is_none() {
                        day_of_month = (slot + MONTH_BLOCK_WEEKS * 7 + 1).checked_sub(offset);
                    }

                    let kind = day_of_month
                        .filter(|&d| d >= 1 && d <= total_days)
                        .and_then(|d| first.with_day(d as u32))
                        .filter(|&day| range.contains(day))
                        .map_or(CellKind::Padding, CellKind::Day);

                    cells.push(GridCell {
                        column: base + week,
                        row,
                        kind,
                    });
                }
            }
        }

        Self {
            cells,
            month_starts,
            row_weekdays: SUNDAY_FIRST,
        }
    }
}

/// Week columns a month naturally spans: `ceil((offset + days) / 7)`.
pub fn month_weeks(first_weekday_offset: usize, days: usize) -> usize {
    (first_weekday_offset + days).div_ceil(7)
}
