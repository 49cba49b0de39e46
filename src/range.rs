//! Date-window handling for the asteroid feed.
//!
//! The NEO feed accepts at most a week per request, so every user-supplied
//! pair of dates goes through [`DateRange::normalize`] before it reaches the
//! client. The normalizer never rejects input; it only clamps.

use chrono::{Days, Local, NaiveDate};
use std::fmt;

/// Longest span, in days, between `start` and `end`.
pub const MAX_SPAN_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a valid window from optional bounds.
    ///
    /// A missing start becomes `today`, a missing end becomes `start + 7`,
    /// an end before the start collapses to the start, and anything wider than
    /// [`MAX_SPAN_DAYS`] is cut back to `start + 7`.
    pub fn normalize(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Self {
        let start = start.unwrap_or(today);
        let limit = add_days(start, MAX_SPAN_DAYS);
        let end = end.unwrap_or(limit).clamp(start, limit);
        Self { start, end }
    }

    /// Same as [`normalize`](Self::normalize) with the local calendar date as today.
    pub fn normalize_local(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::normalize(start, end, local_today())
    }

    /// The window one week earlier (negative) or later (positive), keeping its length.
    pub fn shifted_weeks(&self, weeks: i64) -> Self {
        let days = Days::new(weeks.unsigned_abs() * MAX_SPAN_DAYS);
        let moved = |d: NaiveDate| {
            if weeks < 0 {
                d.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
            } else {
                d.checked_add_days(days).unwrap_or(NaiveDate::MAX)
            }
        };
        Self::normalize(Some(moved(self.start)), Some(moved(self.end)), self.start)
    }

    pub fn span_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }

    /// `YYYYMMDD_YYYYMMDD`, used in export filenames.
    pub fn compact(&self) -> String {
        format!("{}_{}", self.start.format("%Y%m%d"), self.end.format("%Y%m%d"))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
