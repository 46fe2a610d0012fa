//! Slicing a date range into fixed-size check windows

use chrono::{Duration, Months, NaiveDateTime};

/// A half-open time interval `[start, end)` covered by one equivalence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Size of each check window, in calendar units.
///
/// Month steps add whole calendar months (honoring variable month lengths)
/// rather than a fixed number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStep {
    Days(u32),
    Months(u32),
}

impl DateStep {
    /// Advance a point in time by one step.
    pub fn advance(self, from: NaiveDateTime) -> NaiveDateTime {
        match self {
            DateStep::Days(days) => from + Duration::days(days as i64),
            DateStep::Months(months) => from + Months::new(months),
        }
    }
}

/// Convert a date range and step to a series of check windows.
///
/// Produces contiguous, non-overlapping windows that exactly tile
/// `[date_start, date_end)`. The end takes precedence over the step, so the
/// final window may be shorter than `date_step`. An empty range (start at or
/// after end) yields no windows.
pub fn date_limits_to_intervals(
    date_start: NaiveDateTime,
    date_end: NaiveDateTime,
    date_step: DateStep,
) -> Vec<TimeWindow> {
    let mut intervals = Vec::new();
    let mut interval_start = date_start;
    while interval_start < date_end {
        let interval_end = date_step.advance(interval_start).min(date_end);
        intervals.push(TimeWindow {
            start: interval_start,
            end: interval_end,
        });
        interval_start = interval_end;
    }
    intervals
}
