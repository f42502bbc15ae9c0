//! The only time arithmetic in the system. Both windows are UTC-anchored
//! and half-open; keeping them as pure functions lets the boundary rules be
//! tested without a database.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Number of trailing calendar days covered by the weekly summary.
pub const SUMMARY_WINDOW_DAYS: i64 = 7;

/// The 24-hour window `[00:00:00, 24:00:00)` of a UTC calendar date.
pub fn daily_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Start of the trailing-week window: exactly seven calendar days before the
/// start of the current UTC day, not seven rolling 24-hour periods. A call at
/// 23:00 on day N therefore reaches back to 00:00 on day N-7.
pub fn trailing_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    start_of_today - Duration::days(SUMMARY_WINDOW_DAYS)
}
