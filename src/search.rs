// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunation search.
//!
//! Locating phase instants around a date in two steps: estimate the lunation
//! number from the calendar, then walk mean new moons until two consecutive
//! ones bracket the date. True phase instants are evaluated from the
//! bracketing lunations only.

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::LunarConfig;
use crate::ephemeris::EphemerisSample;
use crate::error::{FullMoonError, Result};
use crate::phase::{mean_phase, true_phase, LunarPhase, SynodicIndex};
use crate::timestamp::Timestamp;
use crate::{Interval, JulianDate, Period, JD};

/// Mean lunations per Julian year.
const LUNATIONS_PER_YEAR: f64 = 12.3685;

/// Instants the searches accept: JD 0 (4713 BC January 1, noon) up to
/// 10000-01-01T00:00:00Z.
///
/// The calendar estimate runs ahead of the true lunation by about
/// 0.0075 d per Gregorian year, and the secular terms of the phase
/// polynomials grow with the square of the distance from 1900.
pub const SUPPORTED_RANGE: Period<JD> = Interval {
    start: JulianDate::new(0.0),
    end: JulianDate::new(5_373_484.5),
};

/// Bracket steps allowed. A 366-day lookback needs about fourteen.
const MAX_BRACKET_STEPS: usize = 24;

/// Lunations walked by [`phase_events`] besides those spanning the window.
const SCAN_SLACK_LUNATIONS: usize = 6;

/// Julian Date of `timestamp` if it lies in [`SUPPORTED_RANGE`].
pub fn supported_instant(timestamp: Timestamp) -> Result<JulianDate> {
    let jd = JulianDate::from_unix_seconds(timestamp as f64);
    if SUPPORTED_RANGE.contains(jd) {
        Ok(jd)
    } else {
        Err(FullMoonError::OutOfSupportedRange(timestamp))
    }
}

fn outside_range(jd: JulianDate) -> FullMoonError {
    FullMoonError::OutOfSupportedRange(jd.to_unix_seconds().floor() as Timestamp)
}

fn ensure_supported(jd: JulianDate) -> Result<()> {
    if SUPPORTED_RANGE.contains(jd) {
        Ok(())
    } else {
        Err(outside_range(jd))
    }
}

/// First guess at the lunation in progress at `jd`.
///
/// `floor((year + (month - 1) / 12 - 1900) * 12.3685)`. Day of month is
/// ignored, so the estimate may lag the true lunation by one. It also runs
/// ahead with distance from 1900, by about two lunations near year 8000.
pub fn estimate_synodic_index(jd: JulianDate) -> SynodicIndex {
    let date = jd.to_calendar();
    ((date.fractional_year() - 1900.0) * LUNATIONS_PER_YEAR).floor() as SynodicIndex
}

/// The pair of consecutive lunations `(k1, k1 + 1)` whose mean new moons
/// bracket `origin`.
///
/// The walk starts `config.lookback_days` before `origin` and advances one
/// synodic month per step, giving up after a fixed number of steps.
pub fn bracket_new_moons(
    origin: JulianDate,
    config: &LunarConfig,
) -> Result<(SynodicIndex, SynodicIndex)> {
    ensure_supported(origin)?;
    let fidelity = config.fidelity;
    let synodic = fidelity.synodic_month();

    let mut reference = origin - config.lookback();
    let mut k1 = estimate_synodic_index(reference);
    reference = mean_phase(reference, k1, fidelity);
    let mut nt1 = reference;

    for _ in 0..MAX_BRACKET_STEPS {
        reference += synodic;
        let k2 = k1 + 1;
        let nt2 = mean_phase(reference, k2, fidelity);
        trace!("bracket k1={k1} nt1={nt1} k2={k2} nt2={nt2}");
        if nt1 <= reference && nt2 > origin {
            return Ok((k1, k2));
        }
        nt1 = nt2;
        k1 = k2;
    }

    Err(FullMoonError::SearchExhausted {
        jd: origin.value(),
        steps: MAX_BRACKET_STEPS,
    })
}

/// First true full moon at or after `origin`.
pub fn next_full_moon(origin: JulianDate, config: &LunarConfig) -> Result<JulianDate> {
    let (k1, k2) = bracket_new_moons(origin, config)?;
    let candidate = true_phase(k1, LunarPhase::Full, config.fidelity);
    if candidate < origin {
        Ok(true_phase(k2, LunarPhase::Full, config.fidelity))
    } else {
        Ok(candidate)
    }
}

/// A principal phase and the instant it occurs.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseEvent {
    pub phase: LunarPhase,
    pub lunation: SynodicIndex,
    pub time: JulianDate,
}

impl PhaseEvent {
    /// Seconds since the Unix epoch, fractional.
    #[inline]
    pub fn unix_seconds(&self) -> f64 {
        self.time.to_unix_seconds()
    }

    /// Sun and Moon at the instant of the event.
    pub fn sample(&self, config: &LunarConfig) -> Result<EphemerisSample> {
        EphemerisSample::at(self.time, config)
    }
}

/// Every principal phase falling in `[window.start, window.end)`, in
/// chronological order.
///
/// The window must lie inside [`SUPPORTED_RANGE`]. The scan starts two
/// lunations before the calendar estimate for the window start and stops at
/// the first phase at or past the window end.
pub fn phase_events(window: Period<JD>, config: &LunarConfig) -> Result<Vec<PhaseEvent>> {
    if !SUPPORTED_RANGE.covers(&window) {
        let outside = if SUPPORTED_RANGE.contains(window.start) {
            window.end
        } else {
            window.start
        };
        return Err(outside_range(outside));
    }

    let spanned = window.duration().value() / config.fidelity.synodic_month().value();
    let budget = spanned.ceil().max(0.0) as usize + SCAN_SLACK_LUNATIONS;

    let mut events = Vec::new();
    let mut lunation = estimate_synodic_index(window.start) - 2;
    for _ in 0..budget {
        for phase in LunarPhase::ALL {
            let time = true_phase(lunation, phase, config.fidelity);
            if time >= window.end {
                return Ok(events);
            }
            if time >= window.start {
                trace!("{phase} of lunation {lunation} at {time}");
                events.push(PhaseEvent {
                    phase,
                    lunation,
                    time,
                });
            }
        }
        lunation += 1;
    }

    Err(FullMoonError::SearchExhausted {
        jd: window.start.value(),
        steps: budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fidelity;
    use qtty::Days;

    // 1998-07-12T00:00:00Z
    const JULY_12_1998: f64 = 900_201_600.0;

    #[test]
    fn estimate_for_mid_1998() {
        let jd = JulianDate::from_unix_seconds(JULY_12_1998);
        // floor(98.5 * 12.3685)
        assert_eq!(estimate_synodic_index(jd), 1218);
    }

    #[test]
    fn bracket_contains_origin() {
        for config in [LunarConfig::default(), LunarConfig::legacy()] {
            let origin = JulianDate::from_unix_seconds(JULY_12_1998);
            let (k1, k2) = bracket_new_moons(origin, &config).unwrap();
            assert_eq!(k2, k1 + 1);
            assert_eq!(k1, 1218);
            let new_moon = true_phase(k1, LunarPhase::New, config.fidelity);
            assert!(new_moon <= origin + Days::new(1.0));
        }
    }

    #[test]
    fn next_full_moon_after_mid_july_1998() {
        let origin = JulianDate::from_unix_seconds(JULY_12_1998);

        let corrected = next_full_moon(origin, &LunarConfig::default()).unwrap();
        // 1998-08-08T02:11:47Z
        assert!((corrected.to_unix_seconds() - 902_542_307.0).abs() < 2.0);

        let legacy = next_full_moon(origin, &LunarConfig::legacy()).unwrap();
        // 1998-08-07T14:37:10Z
        assert!((legacy.to_unix_seconds() - 902_500_630.0).abs() < 2.0);
    }

    #[test]
    fn next_full_moon_is_never_before_origin() {
        let config = LunarConfig::default();
        let start = JulianDate::new(2_451_545.0);
        for step in 0..120 {
            let origin = start + Days::new(step as f64 * 3.1);
            let full = next_full_moon(origin, &config).unwrap();
            assert!(full >= origin, "{origin}");
            assert!((full - origin).value() < 30.0, "{origin}");
        }
    }

    #[test]
    fn events_in_a_lunation_come_in_order() {
        let start = JulianDate::from_unix_seconds(JULY_12_1998);
        let window = Period::new(start, start + Days::new(30.0));
        let events = phase_events(window, &LunarConfig::default()).unwrap();
        assert_eq!(events.len(), 4);
        assert!(events.windows(2).all(|w| w[0].time < w[1].time));
        assert!(events.iter().all(|e| window.contains(e.time)));
        let full = events
            .iter()
            .find(|e| e.phase == LunarPhase::Full)
            .unwrap();
        assert_eq!(full.lunation, 1219);
    }

    #[test]
    fn empty_window_has_no_events() {
        // 1992-07-12 ± 12 h falls between first quarter and full moon
        let center = JulianDate::from_unix_seconds(710_899_200.0);
        let window = Period::centered(center, Days::new(0.5));
        for fidelity in [Fidelity::Corrected, Fidelity::Legacy] {
            let events = phase_events(window, &LunarConfig::with_fidelity(fidelity)).unwrap();
            assert!(events.is_empty(), "{fidelity:?}: {events:?}");
        }
    }

    #[test]
    fn full_moon_event_is_fully_lit() {
        let center = JulianDate::from_unix_seconds(902_534_400.0);
        let window = Period::centered(center, Days::new(0.5));
        let config = LunarConfig::default();
        let events = phase_events(window, &config).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, LunarPhase::Full);
        assert!(events[0].sample(&config).unwrap().illuminated_fraction > 0.99);
    }

    #[test]
    fn supported_range_bounds() {
        // JD 0 and 10000-01-01T00:00:00Z
        assert!(supported_instant(-210_866_760_000).is_ok());
        assert!(supported_instant(253_402_300_799).is_ok());
        for ts in [-210_866_760_001, 253_402_300_800, 100_000_000_000_000_000] {
            assert!(
                matches!(supported_instant(ts), Err(FullMoonError::OutOfSupportedRange(t)) if t == ts),
                "{ts}"
            );
        }
    }

    #[test]
    fn far_future_origin_is_rejected() {
        let origin = JulianDate::from_unix_seconds(1e17);
        for config in [LunarConfig::default(), LunarConfig::legacy()] {
            assert!(matches!(
                next_full_moon(origin, &config),
                Err(FullMoonError::OutOfSupportedRange(_))
            ));
        }
    }

    #[test]
    fn window_leaving_the_range_is_rejected() {
        let end = SUPPORTED_RANGE.end;
        let window = Period::new(end - Days::new(1.0), end + Days::new(1.0));
        match phase_events(window, &LunarConfig::default()) {
            Err(FullMoonError::OutOfSupportedRange(ts)) => assert_eq!(ts, 253_402_387_200),
            other => panic!("unexpected: {other:?}"),
        }
        let inside = Period::new(end - Days::new(1.0), end);
        assert!(phase_events(inside, &LunarConfig::default()).is_ok());
    }

    #[test]
    fn bracket_gives_up_after_its_step_budget() {
        let config = LunarConfig {
            lookback_days: 10_000.0,
            ..LunarConfig::default()
        };
        let origin = JulianDate::from_unix_seconds(JULY_12_1998);
        assert!(matches!(
            bracket_new_moons(origin, &config),
            Err(FullMoonError::SearchExhausted { steps: 24, .. })
        ));
    }

    #[test]
    fn full_moons_near_both_ends_of_the_range() {
        for config in [LunarConfig::default(), LunarConfig::legacy()] {
            for origin in [SUPPORTED_RANGE.start, SUPPORTED_RANGE.end - Days::new(1e-3)] {
                let full = next_full_moon(origin, &config).unwrap();
                assert!(full >= origin, "{origin}");
                assert!((full - origin).value() < 30.0, "{origin}");
            }
        }
    }

    #[test]
    fn scan_catches_events_late_in_the_range() {
        // The calendar estimate runs about two lunations ahead by year 7800.
        let center = JulianDate::from_unix_seconds(184_403_001_600.0);
        let window = Period::centered(center, Days::new(0.5));
        let events = phase_events(window, &LunarConfig::default()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, LunarPhase::LastQuarter);
    }
}
