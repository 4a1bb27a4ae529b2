// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Low-precision Sun and Moon ephemeris
//!
//! Closed-form positions of the Sun and the Moon after the method of Duffett-
//! Smith, *Practical Astronomy with your Calculator*: mean elements at the
//! 1980.0 epoch, a Kepler solve for the Sun, and five periodic corrections
//! (evection, annual equation, third correction, equation of the centre,
//! variation) for the Moon.
//!
//! ## Accuracy
//! Lunar longitude to a few arc-minutes; illuminated fraction to about 0.2 %.
//! Enough to tell a full moon from a gibbous one, nowhere near enough for
//! occultations.
//!
//! ## Quick Example
//! ```rust
//! use fullmoon::{EphemerisSample, JulianDate, LunarConfig};
//!
//! // 1998-08-08T02:11Z, a full moon
//! let jd = JulianDate::from_unix_seconds(902_542_307.0);
//! let sample = EphemerisSample::at(jd, &LunarConfig::default()).unwrap();
//! assert!(sample.illuminated_fraction > 0.99);
//! ```

use log::warn;
use qtty::Days;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Fidelity, LunarConfig};
use crate::error::{FullMoonError, Result};
use crate::JulianDate;

// ── Sun, epoch 1980.0 ────────────────────────────────────────────────────

/// Ecliptic longitude of the Sun at epoch 1980.0, degrees.
pub const ELONGE: f64 = 278.833_540;
/// Ecliptic longitude of the Sun at perigee, degrees.
pub const ELONGP: f64 = 282.596_403;
/// Eccentricity of Earth's orbit.
pub const ECCENT: f64 = 0.016_718;
/// Semi-major axis of Earth's orbit, km.
pub const SUNSMAX: f64 = 1.495_985e8;
/// Sun's angular size at semi-major axis distance, degrees.
pub const SUNANGSIZ: f64 = 0.533_128;

// ── Moon, epoch 1980.0 ───────────────────────────────────────────────────

/// Moon's mean longitude at the epoch, degrees.
pub const MMLONG: f64 = 64.975_464;
/// Mean longitude of the perigee at the epoch, degrees.
pub const MMLONGP: f64 = 349.383_063;
/// Mean longitude of the node at the epoch, degrees.
pub const MLNODE: f64 = 151.950_429;
/// Inclination of the Moon's orbit, degrees.
pub const MINC: f64 = 5.145_396;
/// Eccentricity of the Moon's orbit.
pub const MECC: f64 = 0.054_900;
/// Moon's angular size at distance `MSMAX`, degrees.
pub const MANGSIZ: f64 = 0.5181;
/// Semi-major axis of the Moon's orbit, km.
pub const MSMAX: f64 = 384_401.0;
/// Horizontal parallax at distance `MSMAX`, degrees.
pub const MPARALLAX: f64 = 0.9507;

const TROPICAL_YEAR_DAYS: f64 = 365.2422;

/// Reduce an angle in degrees to `[0, 360)`.
#[inline]
pub fn fix_angle(angle: f64) -> f64 {
    let reduced = angle - 360.0 * (angle / 360.0).floor();
    // floor() of a tiny negative ratio yields exactly 360.0 after rounding
    if reduced >= 360.0 {
        reduced - 360.0
    } else {
        reduced
    }
}

#[inline]
pub(crate) fn dsin(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

#[inline]
pub(crate) fn dcos(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

/// Eccentric anomaly (radians) for a mean anomaly in degrees.
///
/// Newton–Raphson on `E − e·sin E = M`, starting from `E = M`.
///
/// With [`Fidelity::Corrected`] the iteration runs until the residual is at
/// most `config.kepler_tolerance`, failing with
/// [`FullMoonError::KeplerNotConverged`] after `config.kepler_max_iterations`.
///
/// With [`Fidelity::Legacy`] the loop stops at the first residual *above*
/// the tolerance, which in practice means a single Newton step. A first
/// residual already within tolerance keeps iterating, up to the same bound,
/// and the last estimate is returned.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64, config: &LunarConfig) -> Result<f64> {
    let m = mean_anomaly.to_radians();
    let mut e = m;

    for _ in 0..config.kepler_max_iterations {
        let delta = e - eccentricity * e.sin() - m;
        e -= delta / (1.0 - eccentricity * e.cos());

        let converged = delta.abs() <= config.kepler_tolerance;
        match config.fidelity {
            Fidelity::Corrected if converged => return Ok(e),
            Fidelity::Legacy if !converged => return Ok(e),
            _ => {}
        }
    }

    match config.fidelity {
        Fidelity::Legacy => Ok(e),
        Fidelity::Corrected => {
            warn!(
                "Kepler solver hit {} iterations (M = {mean_anomaly}°, e = {eccentricity})",
                config.kepler_max_iterations
            );
            Err(FullMoonError::KeplerNotConverged {
                mean_anomaly,
                eccentricity,
                iterations: config.kepler_max_iterations,
            })
        }
    }
}

/// Geocentric position of the Sun.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SunPosition {
    /// Mean anomaly, degrees in `[0, 360)`.
    pub mean_anomaly: f64,
    /// Ecliptic longitude, degrees in `[0, 360)`.
    pub ecliptic_longitude: f64,
    pub distance_km: f64,
    /// Apparent angular diameter, degrees.
    pub angular_diameter: f64,
}

/// Position of the Sun `day` days after the 1980.0 epoch.
pub fn sun_position(day: Days, config: &LunarConfig) -> Result<SunPosition> {
    let n = fix_angle((360.0 / TROPICAL_YEAR_DAYS) * day.value());
    let mean_anomaly = fix_angle(n + ELONGE - ELONGP);

    let ec = solve_kepler(mean_anomaly, ECCENT, config)?;
    let ec = ((1.0 + ECCENT) / (1.0 - ECCENT)).sqrt() * (ec / 2.0).tan();
    let true_anomaly = 2.0 * ec.atan().to_degrees();

    let ecliptic_longitude = fix_angle(true_anomaly + ELONGP);
    // orbital distance factor
    let f = (1.0 + ECCENT * dcos(true_anomaly)) / (1.0 - ECCENT * ECCENT);

    Ok(SunPosition {
        mean_anomaly,
        ecliptic_longitude,
        distance_km: SUNSMAX / f,
        angular_diameter: f * SUNANGSIZ,
    })
}

/// Geocentric position of the Moon.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoonPosition {
    /// Ecliptic longitude, degrees in `[0, 360)`.
    pub ecliptic_longitude: f64,
    /// Ecliptic latitude, degrees.
    pub ecliptic_latitude: f64,
    /// Elongation from the Sun, degrees in `[0, 360)`; 180 at full moon.
    pub age_angle: f64,
    pub distance_km: f64,
    /// Apparent angular diameter, degrees.
    pub angular_diameter: f64,
    /// Horizontal parallax, degrees.
    pub parallax: f64,
}

/// Position of the Moon `day` days after the 1980.0 epoch, given the Sun's
/// position at the same instant.
pub fn moon_position(day: Days, sun: &SunPosition) -> MoonPosition {
    let day = day.value();
    let lambda_sun = sun.ecliptic_longitude;
    let sun_anomaly = sun.mean_anomaly.to_radians();

    // mean longitude, mean anomaly, ascending node
    let ml = fix_angle(13.176_396_6 * day + MMLONG);
    let mm = fix_angle(ml - 0.111_404_1 * day - MMLONGP);
    let mn = fix_angle(MLNODE - 0.052_953_9 * day);

    let evection = 1.2739 * dsin(2.0 * (ml - lambda_sun) - mm);
    let annual_eq = 0.1858 * sun_anomaly.sin();
    let a3 = 0.37 * sun_anomaly.sin();

    let mmp = mm + evection - annual_eq - a3;
    let centre = 6.2886 * dsin(mmp);
    let a4 = 0.214 * dsin(2.0 * mmp);

    let lp = ml + evection + centre - annual_eq + a4;
    let variation = 0.6583 * dsin(2.0 * (lp - lambda_sun));
    let lpp = lp + variation;

    let np = mn - 0.16 * sun_anomaly.sin();
    let y = dsin(lpp - np) * dcos(MINC);
    let x = dcos(lpp - np);

    let ecliptic_longitude = fix_angle(y.atan2(x).to_degrees() + np);
    let ecliptic_latitude = (dsin(lpp - np) * dsin(MINC)).asin().to_degrees();

    let distance_km = (MSMAX * (1.0 - MECC * MECC)) / (1.0 + MECC * dcos(mmp + centre));
    let distance_fraction = distance_km / MSMAX;

    MoonPosition {
        ecliptic_longitude,
        ecliptic_latitude,
        age_angle: fix_angle(lpp - lambda_sun),
        distance_km,
        angular_diameter: MANGSIZ / distance_fraction,
        parallax: MPARALLAX / distance_fraction,
    }
}

/// Everything the phase engine derives about one instant.
///
/// Recomputed on demand; nothing here is cached.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EphemerisSample {
    /// Position in the lunation, `[0, 1)`: 0 new, 0.25 first quarter,
    /// 0.5 full, 0.75 last quarter.
    pub phase_fraction: f64,
    /// Illuminated fraction of the disc, `[0, 1]`.
    pub illuminated_fraction: f64,
    /// Days since the last new moon.
    pub age_days: f64,
    pub moon_distance_km: f64,
    /// Degrees.
    pub moon_angular_diameter: f64,
    pub sun_distance_km: f64,
    /// Degrees.
    pub sun_angular_diameter: f64,
    pub moon_ecliptic_longitude: f64,
    pub moon_ecliptic_latitude: f64,
    pub moon_parallax: f64,
}

impl EphemerisSample {
    /// Sample the Sun and Moon at `jd`.
    pub fn at(jd: JulianDate, config: &LunarConfig) -> Result<Self> {
        let day = jd.days_since_1980();
        let sun = sun_position(day, config)?;
        let moon = moon_position(day, &sun);

        let phase_fraction = moon.age_angle / 360.0;
        Ok(Self {
            phase_fraction,
            illuminated_fraction: (1.0 - dcos(moon.age_angle)) / 2.0,
            age_days: config.fidelity.synodic_month().value() * phase_fraction,
            moon_distance_km: moon.distance_km,
            moon_angular_diameter: moon.angular_diameter,
            sun_distance_km: sun.distance_km,
            sun_angular_diameter: sun.angular_diameter,
            moon_ecliptic_longitude: moon.ecliptic_longitude,
            moon_ecliptic_latitude: moon.ecliptic_latitude,
            moon_parallax: moon.parallax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrected() -> LunarConfig {
        LunarConfig::default()
    }

    #[test]
    fn fix_angle_reduces_into_range() {
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (360.0, 0.0),
            (361.0, 1.0),
            (-1.0, 359.0),
            (-450.0, 270.0),
            (720.5, 0.5),
        ];
        for &(input, expected) in cases {
            assert!((fix_angle(input) - expected).abs() < 1e-9, "{input}");
        }
    }

    #[test]
    fn fix_angle_never_returns_360() {
        let reduced = fix_angle(-1e-14);
        assert!((0.0..360.0).contains(&reduced), "{reduced}");
    }

    #[test]
    fn kepler_zero_anomaly() {
        let e = solve_kepler(0.0, ECCENT, &corrected()).unwrap();
        assert_eq!(e, 0.0);
    }

    #[test]
    fn kepler_satisfies_equation() {
        let config = corrected();
        for m_deg in [10.0, 95.0, 180.0, 271.5, 359.0] {
            let e = solve_kepler(m_deg, ECCENT, &config).unwrap();
            let residual = e - ECCENT * e.sin() - f64::to_radians(m_deg);
            assert!(residual.abs() < 1e-9, "M = {m_deg}: residual {residual}");
        }
    }

    #[test]
    fn kepler_high_eccentricity_converges() {
        let e = solve_kepler(30.0, 0.9, &corrected()).unwrap();
        let residual = e - 0.9 * e.sin() - 30f64.to_radians();
        assert!(residual.abs() < 1e-6);
    }

    #[test]
    fn kepler_iteration_bound_is_an_error() {
        let config = LunarConfig {
            kepler_max_iterations: 1,
            kepler_tolerance: 0.0,
            ..corrected()
        };
        let err = solve_kepler(100.0, 0.5, &config).unwrap_err();
        assert!(matches!(
            err,
            FullMoonError::KeplerNotConverged { iterations: 1, .. }
        ));
    }

    #[test]
    fn legacy_kepler_takes_a_single_step() {
        let legacy = LunarConfig::legacy();
        let m = 100f64.to_radians();
        let delta = m - ECCENT * m.sin() - m;
        let one_step = m - delta / (1.0 - ECCENT * m.cos());
        assert_eq!(solve_kepler(100.0, ECCENT, &legacy).unwrap(), one_step);
    }

    #[test]
    fn legacy_kepler_terminates_on_converged_start() {
        // The first residual at M = 0 is zero; the loop must still end.
        let e = solve_kepler(0.0, ECCENT, &LunarConfig::legacy()).unwrap();
        assert_eq!(e, 0.0);
    }

    #[test]
    fn sun_distance_within_orbit_extremes() {
        let config = corrected();
        for day in [0.0, 91.0, 182.0, 273.0, 6_780.5] {
            let sun = sun_position(Days::new(day), &config).unwrap();
            assert!(sun.distance_km > SUNSMAX * (1.0 - ECCENT) - 1.0);
            assert!(sun.distance_km < SUNSMAX * (1.0 + ECCENT) + 1.0);
            assert!((0.0..360.0).contains(&sun.ecliptic_longitude));
        }
    }

    #[test]
    fn sample_at_full_moon() {
        // 1998-08-08T02:11:47Z
        let jd = JulianDate::from_unix_seconds(902_542_307.0);
        let sample = EphemerisSample::at(jd, &corrected()).unwrap();
        assert!(sample.illuminated_fraction > 0.999, "{sample:?}");
        assert!((sample.phase_fraction - 0.5).abs() < 0.01, "{sample:?}");
        assert!((sample.age_days - 14.76).abs() < 0.3, "{sample:?}");
        assert!((sample.moon_distance_km - 376_428.0).abs() < 500.0);
        assert!((sample.sun_distance_km - 151_689_433.0).abs() < 10_000.0);
    }

    #[test]
    fn sample_at_j2000() {
        let jd = JulianDate::new(2_451_545.0);
        let sample = EphemerisSample::at(jd, &corrected()).unwrap();
        assert!((sample.phase_fraction - 0.8409).abs() < 1e-3, "{sample:?}");
        assert!((sample.illuminated_fraction - 0.2298).abs() < 1e-3, "{sample:?}");
        assert!((sample.moon_distance_km - 400_216.4).abs() < 5.0, "{sample:?}");
        assert!((sample.sun_angular_diameter - 0.5422).abs() < 1e-3, "{sample:?}");
        assert!((sample.moon_angular_diameter - 0.4976).abs() < 1e-3, "{sample:?}");
    }

    #[test]
    fn sample_bounds_hold_across_a_year() {
        let config = corrected();
        let start = JulianDate::new(2_460_000.5);
        for step in 0..365 * 4 {
            let jd = start + Days::new(step as f64 * 0.25);
            let sample = EphemerisSample::at(jd, &config).unwrap();
            assert!((0.0..=1.0).contains(&sample.illuminated_fraction), "{jd}");
            assert!((0.0..1.0).contains(&sample.phase_fraction), "{jd}");
            assert!(sample.moon_ecliptic_latitude.abs() <= MINC + 1e-9);
        }
    }

    #[test]
    fn legacy_sample_is_close_to_corrected() {
        let jd = JulianDate::new(2_451_545.0);
        let legacy = EphemerisSample::at(jd, &LunarConfig::legacy()).unwrap();
        let corrected = EphemerisSample::at(jd, &corrected()).unwrap();
        assert!((legacy.illuminated_fraction - corrected.illuminated_fraction).abs() < 1e-3);
    }
}
