// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Full-moon classification of a single day.

use chrono::{DateTime, TimeZone};
use log::{debug, trace};

use crate::config::{Fidelity, LunarConfig};
use crate::error::Result;
use crate::search::{self, PhaseEvent};
use crate::timestamp::{self, Timestamp};
use crate::{JulianDate, LunarPhase, Period, JD};

/// Answers whether a full moon occurs within half a day of an instant.
///
/// The classifier collects every principal phase in
/// `[t - 12 h, t + 12 h)` and samples the Moon's illumination at each one.
/// With [`Fidelity::Corrected`] a day is a full-moon day when the full-moon
/// event itself falls in the window and is lit past one half.
/// [`Fidelity::Legacy`] accepts any event whose illuminated fraction rounds to
/// one, so a last quarter lit just over one half also counts there.
///
/// ```
/// use fullmoon::IsFullMoon;
///
/// let mut query = IsFullMoon::new();
/// query.set_date_string("1998-08-08").unwrap();
/// assert!(query.is_full_moon().unwrap());
///
/// query.set_date_string("1992-07-12").unwrap();
/// assert!(!query.is_full_moon().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct IsFullMoon {
    date: Timestamp,
    config: LunarConfig,
}

impl IsFullMoon {
    /// Query the current wall-clock time with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LunarConfig::default())
    }

    pub fn with_config(config: LunarConfig) -> Self {
        Self {
            date: timestamp::now(),
            config,
        }
    }

    pub fn config(&self) -> &LunarConfig {
        &self.config
    }

    /// The instant being classified.
    pub fn date(&self) -> Timestamp {
        self.date
    }

    pub fn set_date(&mut self, date: Timestamp) -> &mut Self {
        self.date = date;
        self
    }

    pub fn set_date_now(&mut self) -> &mut Self {
        self.set_date(timestamp::now())
    }

    pub fn set_date_datetime<Tz: TimeZone>(&mut self, datetime: &DateTime<Tz>) -> &mut Self {
        self.set_date(timestamp::from_datetime(datetime))
    }

    /// Set the date from a string in the configured
    /// [`date_format`](LunarConfig::date_format). Date-only strings mean
    /// midnight UTC.
    pub fn set_date_string(&mut self, input: &str) -> Result<&mut Self> {
        let date = timestamp::parse_date_string(input, &self.config.date_format)?;
        Ok(self.set_date(date))
    }

    pub fn set_date_string_with_format(&mut self, input: &str, format: &str) -> Result<&mut Self> {
        let date = timestamp::parse_date_string(input, format)?;
        Ok(self.set_date(date))
    }

    /// The window examined around `date`.
    pub fn window_around(&self, date: Timestamp) -> Period<JD> {
        let center = JulianDate::from_unix_seconds(date as f64);
        Period::centered(center, self.config.window_half_width())
    }

    /// Principal phases in the window around the stored date.
    pub fn phase_events(&self) -> Result<Vec<PhaseEvent>> {
        self.config.validate()?;
        search::phase_events(self.window_around(self.date), &self.config)
    }

    /// Classify the stored date.
    pub fn is_full_moon(&self) -> Result<bool> {
        self.is_full_moon_at(self.date)
    }

    /// Classify `date` without touching the stored one.
    ///
    /// `date` must lie in [`SUPPORTED_RANGE`](search::SUPPORTED_RANGE), and
    /// so must the whole window around it.
    pub fn is_full_moon_at(&self, date: Timestamp) -> Result<bool> {
        self.config.validate()?;
        search::supported_instant(date)?;
        let window = self.window_around(date);
        let events = search::phase_events(window, &self.config)?;

        let mut full = false;
        for event in &events {
            let illumination = event.sample(&self.config)?.illuminated_fraction;
            trace!("{} at {}: illumination {illumination:.4}", event.phase, event.time);

            let lit = illumination.round() >= 1.0;
            let counts = match self.config.fidelity {
                Fidelity::Corrected => lit && event.phase == LunarPhase::Full,
                Fidelity::Legacy => lit,
            };
            if counts {
                full = true;
                break;
            }
        }

        debug!(
            "{date}: {} phase event(s) in {window}, full moon: {full}",
            events.len()
        );
        Ok(full)
    }
}

impl Default for IsFullMoon {
    fn default() -> Self {
        Self::new()
    }
}
