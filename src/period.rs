// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open time windows.
//!
//! - [`Interval<T>`]: `[start, end)` over any [`TimeInstant`]
//! - [`Period<S>`]: the same over `Time<S>`
//!
//! The full-moon classifier scans a `Period<JD>` centred on the queried
//! instant, and [`SUPPORTED_RANGE`](crate::search::SUPPORTED_RANGE) bounds
//! every search.

use super::{Time, TimeInstant};
use qtty::Days;
use std::fmt;

/// Instants from `start` (inclusive) to `end` (exclusive).
///
/// # Examples
///
/// ```
/// use fullmoon::{Interval, JulianDate};
/// use qtty::Days;
///
/// let start = JulianDate::new(2451545.0);
/// let window = Interval::new(start, start + Days::new(1.5));
///
/// assert_eq!(window.duration(), Days::new(1.5));
/// assert!(window.contains(start));
/// assert!(!window.contains(window.end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// `Period<JD>`, `Period<UnixTime>`
pub type Period<S> = Interval<Time<S>>;

impl<T: TimeInstant> Interval<T> {
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    #[inline]
    pub fn contains(&self, instant: T) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Whether `other` lies entirely inside this interval.
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

impl<T: TimeInstant<Duration = Days>> Interval<T> {
    /// `[center - half_width, center + half_width)`
    pub fn centered(center: T, half_width: Days) -> Self {
        Interval::new(
            center.sub_duration(half_width),
            center.add_duration(half_width),
        )
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
