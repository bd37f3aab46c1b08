//! Shared primitive types used across the analytics pipeline.

use chrono::NaiveDate;

/// Calendar-month key in "YYYY-MM" form, the grain of all KPI aggregates.
pub type Month = String;

/// Stable identifier for one analytics run.
pub type RunId = String;

/// Month key for a calendar date.
pub fn month_key(date: NaiveDate) -> Month {
    date.format("%Y-%m").to_string()
}
