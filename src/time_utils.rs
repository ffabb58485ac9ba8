// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};

/// Day names indexed from Monday.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a local start timestamp as Strava (or an older cache) wrote it.
///
/// Strava labels `start_date_local` with a `Z` even though the wall-clock
/// value is local, so offsets are discarded and the written components kept.
pub fn parse_local_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Render a local timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_local_timestamp(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Calendar decomposition of an activity start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_week: &'static str,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
}

impl CalendarParts {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        let date = dt.date();
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: DAYS_OF_WEEK[date.weekday().num_days_from_monday() as usize],
            date: date.format("%Y-%m-%d").to_string(),
        }
    }
}
