// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date (`Time<JD>`) specific extensions.
//!
//! Unix-second conversion and the calendar decomposition used to seed the
//! synodic-month search.

use chrono::NaiveDate;
use qtty::*;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::instant::Time;
use super::scales::{UnixTime, JD};

impl Time<JD> {
    /// 1900 January 0.5, origin of the lunar phase polynomials (JD 2 415 020.0).
    pub const J1900: Self = Self::new(2_415_020.0);

    /// 1980 January 0.0, epoch of the Sun and Moon orbital elements.
    pub const EPOCH_1980: Self = Self::new(2_444_238.5);

    /// First day of the Gregorian calendar, 1582 October 15.
    pub const GREGORIAN_CUTOVER: Self = Self::new(2_299_161.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian Date of a Unix timestamp: `seconds / 86400 + 2440587.5`.
    #[inline]
    pub fn from_unix_seconds(seconds: f64) -> Self {
        Time::<UnixTime>::from_days(Seconds::new(seconds).to::<Day>()).to::<JD>()
    }

    /// Unix timestamp of this Julian Date: `(jd - 2440587.5) * 86400`.
    #[inline]
    pub fn to_unix_seconds(&self) -> f64 {
        self.to::<UnixTime>().quantity().to::<Second>().value()
    }

    /// Julian centuries elapsed since [`J1900`](Self::J1900).
    #[inline]
    pub fn centuries_since_1900(&self) -> f64 {
        (*self - Self::J1900).value() / Self::JULIAN_CENTURY.value()
    }

    /// Days elapsed since the 1980.0 orbital-element epoch.
    #[inline]
    pub fn days_since_1980(&self) -> Days {
        *self - Self::EPOCH_1980
    }

    /// Civil calendar date containing this instant.
    ///
    /// Meeus' formulation of the Fliegel–Van Flandern inversion, with the
    /// Julian/Gregorian switch at [`GREGORIAN_CUTOVER`](Self::GREGORIAN_CUTOVER).
    /// The fraction of the day is truncated, never rounded: an instant at
    /// 23:59 maps to that same day.
    pub fn to_calendar(&self) -> CalendarDate {
        let td = self.value() + 0.5;
        let z = td.floor();
        let f = td - z;

        let a = if z < Self::GREGORIAN_CUTOVER.value() {
            z
        } else {
            let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
            z + 1.0 + alpha - (alpha / 4.0).floor()
        };

        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = (b - d - (30.6001 * e).floor() + f).trunc();
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

        CalendarDate {
            year: year as i32,
            month: month as u32,
            day: day as u32,
        }
    }
}

/// A proleptic civil date (Julian calendar before 1582-10-15, Gregorian after).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// Year plus the fraction of elapsed months, `year + (month - 1) / 12`.
    #[inline]
    pub fn fractional_year(&self) -> f64 {
        self.year as f64 + (self.month as f64 - 1.0) / 12.0
    }

    /// The same date as a chrono value (proleptic Gregorian).
    ///
    /// Returns `None` for dates chrono cannot represent; dates before the
    /// cutover are Julian-calendar dates and name a different day in chrono.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
