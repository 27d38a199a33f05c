//! Window selection over ordered forecast series
//!
//! Carves bounded display views out of the normalized hourly and daily
//! series. Selectors never fail: an empty window resolves to a documented
//! head-of-series fallback so the UI always has something to show, and
//! every fallback emits a debug event so a silently-wrong series (e.g. a
//! bad timezone yielding no future records) stays observable.
//!
//! Boundary rule throughout: `>=` for the lower bound, `<` for the upper
//! bound, so a record on a boundary is never counted in two adjacent
//! windows.

use chrono::Duration;

use crate::data::{DailyRecord, HourlyRecord, TimePoint};

/// Records returned by [`window`] when the requested interval is empty
pub const WINDOW_FALLBACK_HOURS: usize = 24;

/// The first `count` records at or after `now`
///
/// Fewer records are returned when the series runs out. When no record is
/// at or after `now` (the series is empty, or `now` is past its end), the
/// head of the input is returned unchanged instead.
pub fn next_hours(records: &[HourlyRecord], now: TimePoint, count: usize) -> &[HourlyRecord] {
    let start = records.partition_point(|record| record.time < now);
    if start == records.len() {
        tracing::debug!(
            len = records.len(),
            %now,
            "no records at or after now, falling back to head of series"
        );
        return &records[..count.min(records.len())];
    }

    &records[start..records.len().min(start + count)]
}

/// The first `n` daily records, fewer if the series is shorter
///
/// The daily series always starts at "today", so no fallback is needed.
pub fn first_n_days(records: &[DailyRecord], n: usize) -> &[DailyRecord] {
    &records[..n.min(records.len())]
}

/// Records within the half-open interval `[start, start + duration)`
///
/// An empty interval falls back to the first [`WINDOW_FALLBACK_HOURS`]
/// records of the input, mirroring [`next_hours`]'s fallback policy.
pub fn window(records: &[HourlyRecord], start: TimePoint, duration: Duration) -> &[HourlyRecord] {
    let end = start + duration;
    let lo = records.partition_point(|record| record.time < start);
    let hi = records.partition_point(|record| record.time < end);

    if lo == hi {
        tracing::debug!(
            len = records.len(),
            %start,
            "empty window, falling back to head of series"
        );
        return &records[..WINDOW_FALLBACK_HOURS.min(records.len())];
    }

    &records[lo..hi]
}
