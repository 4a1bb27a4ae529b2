// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible operation of the crate.

use chrono::format::ParseError;

/// Errors raised by date parsing, validation and the searches.
#[derive(Debug, thiserror::Error)]
pub enum FullMoonError {
    /// The date string does not match the given chrono format pattern.
    #[error("cannot parse date {input:?} with format {format:?}: {source}")]
    DateParse {
        input: String,
        format: String,
        #[source]
        source: ParseError,
    },

    /// A phase fraction outside the defined set {0, 0.25, 0.5, 0.75}.
    #[error("unsupported lunar phase fraction {0}; expected one of 0.0, 0.25, 0.5, 0.75")]
    UnsupportedPhase(f64),

    /// Newton iteration on Kepler's equation did not reach the tolerance.
    #[error(
        "Kepler solver did not converge after {iterations} iterations \
         (M = {mean_anomaly}°, e = {eccentricity})"
    )]
    KeplerNotConverged {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
    },

    /// The instant cannot be represented as a `chrono::DateTime<Utc>`.
    #[error("timestamp {0} s is outside the representable UTC range")]
    TimestampOutOfRange(i64),

    /// The instant lies outside the range the phase tables are evaluated
    /// for, JD 0 up to 10000-01-01T00:00:00Z.
    #[error("timestamp {0} s is outside the supported range (JD 0 to 10000-01-01)")]
    OutOfSupportedRange(i64),

    /// A lunation walk ran out of steps before reaching its target.
    #[error("lunation search from JD {jd} gave up after {steps} steps")]
    SearchExhausted { jd: f64, steps: usize },

    /// A [`LunarConfig`](crate::LunarConfig) field the searches cannot use.
    #[error("invalid configuration: {field} = {value}, expected {expected}")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FullMoonError>;
