// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Unix timestamps at the API boundary.
//!
//! Callers hand the searches whole seconds since 1970-01-01T00:00:00Z, a
//! `chrono::DateTime`, or a date string plus a chrono format pattern. Strings
//! carry no timezone and are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{FullMoonError, Result};

/// Whole seconds since the Unix epoch.
pub type Timestamp = i64;

/// The current wall-clock time.
#[inline]
pub fn now() -> Timestamp {
    Utc::now().timestamp()
}

/// Seconds since the epoch of any chrono date-time, sub-second part dropped.
#[inline]
pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Timestamp {
    datetime.timestamp()
}

/// The UTC date-time of a timestamp.
pub fn to_datetime(timestamp: Timestamp) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or(FullMoonError::TimestampOutOfRange(timestamp))
}

/// Parse `input` with the chrono pattern `format`.
///
/// Patterns with a time of day (`%Y-%m-%d %H:%M`) are honoured; date-only
/// patterns (`%d/%m/%Y`) yield midnight UTC.
///
/// ```
/// let ts = fullmoon::timestamp::parse_date_string("12/07/1992", "%d/%m/%Y").unwrap();
/// assert_eq!(ts, 710_899_200);
/// ```
pub fn parse_date_string(input: &str, format: &str) -> Result<Timestamp> {
    let naive = NaiveDateTime::parse_from_str(input, format).or_else(|_| {
        NaiveDate::parse_from_str(input, format)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|source| FullMoonError::DateParse {
                input: input.to_string(),
                format: format.to_string(),
                source,
            })
    })?;
    Ok(naive.and_utc().timestamp())
}
