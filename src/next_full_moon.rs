// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sequential full-moon iterator.

use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::config::LunarConfig;
use crate::error::Result;
use crate::search;
use crate::timestamp::{self, Timestamp};

const SECONDS_PER_DAY: Timestamp = 86_400;

/// Walks forward through successive full moons.
///
/// Each call to [`advance`](Self::advance) returns the first full moon at or
/// after the current origin and moves the origin one day past it, so the
/// next call finds the following full moon. [`reset`](Self::reset) rewinds
/// to the last explicitly set origin.
///
/// ```
/// use fullmoon::{LunarConfig, NextFullMoon};
///
/// let mut moons = NextFullMoon::with_config(LunarConfig::default());
/// moons.set_origin_date_string("1998-07-12").unwrap();
///
/// let first = moons.advance().unwrap();
/// assert_eq!(first.format("%Y-%m-%d").to_string(), "1998-08-08");
/// let second = moons.advance().unwrap();
/// assert_eq!(second.format("%Y-%m-%d").to_string(), "1998-09-06");
/// assert_eq!(moons.call_count(), 2);
/// ```
///
/// The type is also an endless [`Iterator`] over the same sequence.
#[derive(Debug, Clone)]
pub struct NextFullMoon {
    origin: Timestamp,
    last_origin: Timestamp,
    call_count: u64,
    config: LunarConfig,
}

impl NextFullMoon {
    /// Start from the current wall-clock time with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LunarConfig::default())
    }

    /// Start from the current wall-clock time.
    pub fn with_config(config: LunarConfig) -> Self {
        let now = timestamp::now();
        Self {
            origin: now,
            last_origin: now,
            call_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &LunarConfig {
        &self.config
    }

    /// Where the next search starts.
    pub fn origin(&self) -> Timestamp {
        self.origin
    }

    /// The origin [`reset`](Self::reset) returns to.
    pub fn last_origin(&self) -> Timestamp {
        self.last_origin
    }

    /// Searches run since construction, the last [`reset`](Self::reset) or
    /// [`reset_counter`](Self::reset_counter).
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Set the search origin, remembering it for [`reset`](Self::reset).
    pub fn set_origin(&mut self, origin: Timestamp) -> &mut Self {
        self.origin = origin;
        self.last_origin = origin;
        self
    }

    pub fn set_origin_now(&mut self) -> &mut Self {
        self.set_origin(timestamp::now())
    }

    pub fn set_origin_datetime<Tz: TimeZone>(&mut self, datetime: &DateTime<Tz>) -> &mut Self {
        self.set_origin(timestamp::from_datetime(datetime))
    }

    /// Set the origin from a date string in the configured
    /// [`date_format`](LunarConfig::date_format).
    ///
    /// On a parse error the origin is left untouched.
    pub fn set_origin_date_string(&mut self, input: &str) -> Result<&mut Self> {
        let origin = timestamp::parse_date_string(input, &self.config.date_format)?;
        Ok(self.set_origin(origin))
    }

    /// Set the origin from a date string in an explicit chrono pattern.
    pub fn set_origin_date_string_with_format(
        &mut self,
        input: &str,
        format: &str,
    ) -> Result<&mut Self> {
        let origin = timestamp::parse_date_string(input, format)?;
        Ok(self.set_origin(origin))
    }

    /// Rewind the origin to the last value passed to a setter and zero the
    /// call counter.
    pub fn reset(&mut self) -> &mut Self {
        self.origin = self.last_origin;
        self.reset_counter()
    }

    pub fn reset_counter(&mut self) -> &mut Self {
        self.call_count = 0;
        self
    }

    /// The next full moon, floored to the second. Moves the origin to one
    /// day after it.
    ///
    /// Fails with [`OutOfSupportedRange`](crate::FullMoonError::OutOfSupportedRange)
    /// when the origin lies outside
    /// [`SUPPORTED_RANGE`](crate::search::SUPPORTED_RANGE), and with
    /// [`InvalidConfig`](crate::FullMoonError::InvalidConfig) when
    /// [`LunarConfig::validate`] does. Neither moves the origin or counts as a
    /// call.
    pub fn advance(&mut self) -> Result<DateTime<Utc>> {
        let full_moon = self.search()?;
        self.origin = timestamp::from_datetime(&full_moon) + SECONDS_PER_DAY;
        Ok(full_moon)
    }

    /// The next full moon without moving the origin. Still counts as a call.
    pub fn peek(&mut self) -> Result<DateTime<Utc>> {
        self.search()
    }

    fn search(&mut self) -> Result<DateTime<Utc>> {
        self.config.validate()?;
        let origin = search::supported_instant(self.origin)?;
        self.call_count += 1;
        let full_moon = search::next_full_moon(origin, &self.config)?;
        let seconds = full_moon.to_unix_seconds().floor() as Timestamp;
        let datetime = timestamp::to_datetime(seconds)?;
        debug!(
            "full moon #{} after {}: {}",
            self.call_count, self.origin, datetime
        );
        Ok(datetime)
    }
}

impl Default for NextFullMoon {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for NextFullMoon {
    type Item = Result<DateTime<Utc>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FullMoonError;

    const JULY_12_1998: Timestamp = 900_201_600;

    fn from_july_1998(config: LunarConfig) -> NextFullMoon {
        let mut moons = NextFullMoon::with_config(config);
        moons.set_origin(JULY_12_1998);
        moons
    }

    #[test]
    fn corrected_sequence_from_mid_july_1998() {
        let mut moons = from_july_1998(LunarConfig::default());
        let first = moons.advance().unwrap();
        assert_eq!(first.timestamp(), 902_542_307);
        assert_eq!(moons.origin(), 902_542_307 + SECONDS_PER_DAY);

        let second = moons.advance().unwrap();
        assert_eq!(second.to_rfc3339(), "1998-09-06T11:23:19+00:00");
    }

    #[test]
    fn legacy_sequence_from_mid_july_1998() {
        let mut moons = from_july_1998(LunarConfig::legacy());
        let first = moons.advance().unwrap();
        assert_eq!(first.to_rfc3339(), "1998-08-07T14:37:10+00:00");
        let second = moons.advance().unwrap();
        assert_eq!(second.format("%Y-%m-%d").to_string(), "1998-09-06");
    }

    #[test]
    fn reset_replays_the_sequence() {
        for config in [LunarConfig::default(), LunarConfig::legacy()] {
            let mut moons = from_july_1998(config);
            let run: Vec<_> = (0..3).map(|_| moons.advance().unwrap()).collect();
            moons.reset();
            assert_eq!(moons.origin(), JULY_12_1998);
            assert_eq!(moons.call_count(), 0);
            let replay: Vec<_> = (0..3).map(|_| moons.advance().unwrap()).collect();
            assert_eq!(replay, run);
            assert_eq!(moons.call_count(), 3);
        }
    }

    #[test]
    fn origin_outside_supported_range_is_rejected() {
        for origin in [100_000_000_000_000_000, -300_000_000_000] {
            let mut moons = NextFullMoon::with_config(LunarConfig::default());
            moons.set_origin(origin);
            assert!(matches!(
                moons.advance(),
                Err(FullMoonError::OutOfSupportedRange(ts)) if ts == origin
            ));
            assert_eq!(moons.origin(), origin);
            assert_eq!(moons.call_count(), 0);
        }
    }

    #[test]
    fn invalid_config_is_reported_before_searching() {
        let mut moons = from_july_1998(LunarConfig {
            lookback_days: -30.0,
            ..LunarConfig::default()
        });
        assert!(matches!(
            moons.advance(),
            Err(FullMoonError::InvalidConfig {
                field: "lookback_days",
                ..
            })
        ));
        assert_eq!(moons.call_count(), 0);
    }

    #[test]
    fn peek_does_not_move_origin() {
        let mut moons = from_july_1998(LunarConfig::default());
        let peeked = moons.peek().unwrap();
        assert_eq!(moons.origin(), JULY_12_1998);
        assert_eq!(moons.call_count(), 1);
        assert_eq!(moons.advance().unwrap(), peeked);
    }

    #[test]
    fn counter_resets_independently_of_origin() {
        let mut moons = from_july_1998(LunarConfig::default());
        moons.advance().unwrap();
        moons.reset_counter();
        assert_eq!(moons.call_count(), 0);
        assert_ne!(moons.origin(), JULY_12_1998);
    }

    #[test]
    fn bad_date_string_leaves_origin_untouched() {
        let mut moons = from_july_1998(LunarConfig::default());
        let err = moons.set_origin_date_string("July 12th").unwrap_err();
        assert!(matches!(err, FullMoonError::DateParse { .. }));
        assert_eq!(moons.origin(), JULY_12_1998);
    }

    #[test]
    fn explicit_format_setter() {
        let mut moons = NextFullMoon::new();
        moons
            .set_origin_date_string_with_format("12/07/1998", "%d/%m/%Y")
            .unwrap();
        assert_eq!(moons.origin(), JULY_12_1998);
        assert_eq!(moons.last_origin(), JULY_12_1998);
    }

    #[test]
    fn iterator_yields_monthly_steps() {
        let moons = from_july_1998(LunarConfig::default());
        let dates: Vec<_> = moons.take(12).map(|r| r.unwrap()).collect();
        for pair in dates.windows(2) {
            let days = (pair[1] - pair[0]).num_seconds() as f64 / 86_400.0;
            assert!((29.0..30.0).contains(&days), "{days}");
        }
    }
}
