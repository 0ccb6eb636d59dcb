// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and key derivation.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Derive the `YYYY-MM` grouping key from an RFC3339 timestamp string.
///
/// Returns `None` for unparseable timestamps; callers silently skip
/// such activities when aggregating.
pub fn month_key(timestamp: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(format!("{:04}-{:02}", date.year(), date.month()))
}

/// Derive the calendar day from a Strava timestamp string.
///
/// Strava's `start_date_local` carries a `Z` suffix even though the
/// value is wall-clock local time, so only the date prefix is trusted.
pub fn day_of(timestamp: &str) -> Option<NaiveDate> {
    let prefix = timestamp.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// The Monday..Sunday week containing the given day.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = day.weekday().num_days_from_monday() as u64;
    let monday = day - Days::new(offset);
    let sunday = monday + Days::new(6);
    (monday, sunday)
}
