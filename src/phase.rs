// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Principal lunar phases
//!
//! Mean and true instants of new moon, first quarter, full moon and last
//! quarter for a given lunation, after Meeus' pre-1991 tables. Lunations are
//! numbered by the synodic index `k`, with `k = 0` the new moon of
//! 1900 January 0.
//!
//! The true instants are accurate to a couple of minutes between 1900 and
//! 2100 with [`Fidelity::Corrected`].

use std::fmt;

use qtty::Days;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Fidelity;
use crate::ephemeris::{dcos, dsin};
use crate::error::{FullMoonError, Result};
use crate::JulianDate;

/// Lunation number counted from the new moon of 1900 January 0.
pub type SynodicIndex = i64;

/// Julian Date of the mean new moon of lunation 0.
const MEAN_NEW_MOON_1900: f64 = 2_415_020.759_33;

/// Lunations per Julian century.
const LUNATIONS_PER_CENTURY: f64 = 1_236.85;

/// Tolerance when matching a fraction to one of the four phases.
const PHASE_MATCH_TOLERANCE: f64 = 0.01;

/// One of the four principal phases.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LunarPhase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl LunarPhase {
    /// Every phase in lunation order.
    pub const ALL: [LunarPhase; 4] = [
        LunarPhase::New,
        LunarPhase::FirstQuarter,
        LunarPhase::Full,
        LunarPhase::LastQuarter,
    ];

    /// Offset into the lunation: 0, 0.25, 0.5 or 0.75.
    #[inline]
    pub const fn fraction(self) -> f64 {
        match self {
            LunarPhase::New => 0.0,
            LunarPhase::FirstQuarter => 0.25,
            LunarPhase::Full => 0.5,
            LunarPhase::LastQuarter => 0.75,
        }
    }

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            LunarPhase::New => 0,
            LunarPhase::FirstQuarter => 1,
            LunarPhase::Full => 2,
            LunarPhase::LastQuarter => 3,
        }
    }

    /// New and full moon, when Sun and Moon are aligned.
    #[inline]
    pub const fn is_syzygy(self) -> bool {
        matches!(self, LunarPhase::New | LunarPhase::Full)
    }
}

impl TryFrom<f64> for LunarPhase {
    type Error = FullMoonError;

    /// Match a fraction within 0.01 of 0, 0.25, 0.5 or 0.75.
    fn try_from(fraction: f64) -> Result<Self> {
        LunarPhase::ALL
            .into_iter()
            .find(|phase| (fraction - phase.fraction()).abs() < PHASE_MATCH_TOLERANCE)
            .ok_or(FullMoonError::UnsupportedPhase(fraction))
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LunarPhase::New => "new moon",
            LunarPhase::FirstQuarter => "first quarter",
            LunarPhase::Full => "full moon",
            LunarPhase::LastQuarter => "last quarter",
        };
        f.write_str(name)
    }
}

/// Mean instant of new moon for lunation `k`.
///
/// `reference` is the date the lunation was estimated from; it sets the
/// secular terms. With [`Fidelity::Legacy`] only the linear term is kept.
pub fn mean_phase(reference: JulianDate, k: SynodicIndex, fidelity: Fidelity) -> JulianDate {
    let synodic = fidelity.synodic_month();
    let mean = JulianDate::new(MEAN_NEW_MOON_1900) + Days::new(synodic.value() * k as f64);

    match fidelity {
        Fidelity::Legacy => mean,
        Fidelity::Corrected => {
            let t = reference.centuries_since_1900();
            let t2 = t * t;
            let t3 = t2 * t;
            mean + Days::new(
                0.000_117_8 * t2 - 0.000_000_155 * t3
                    + 0.000_33 * dsin(166.56 + 132.87 * t - 0.009_173 * t2),
            )
        }
    }
}

/// True instant of `phase` in lunation `k`.
pub fn true_phase(k: SynodicIndex, phase: LunarPhase, fidelity: Fidelity) -> JulianDate {
    let k = k as f64 + phase.fraction();
    let t = k / LUNATIONS_PER_CENTURY;
    let t2 = t * t;
    let t3 = t2 * t;

    let mean = MEAN_NEW_MOON_1900
        + fidelity.synodic_month().value() * k
        + 0.000_117_8 * t2
        - 0.000_000_155 * t3
        + 0.000_33 * dsin(166.56 + 132.87 * t - 0.009_173 * t2);

    // Sun's mean anomaly, Moon's mean anomaly, Moon's argument of latitude
    let m = 359.2242 + 29.105_356_08 * k - 0.000_033_3 * t2 - 0.000_003_47 * t3;
    let mp = 306.0253 + 385.816_918_06 * k + 0.010_730_6 * t2 + 0.000_012_36 * t3;
    let f = 21.2964 + 390.670_506_46 * k - 0.001_652_8 * t2 - 0.000_002_39 * t3;

    let correction = if phase.is_syzygy() {
        syzygy_terms(t, m, mp, f, fidelity)
    } else {
        let sign = if phase == LunarPhase::FirstQuarter { 1.0 } else { -1.0 };
        quadrature_terms(t, m, mp, f, fidelity)
            + sign * (0.0028 - 0.0004 * dcos(m) + 0.0003 * dcos(mp))
    };

    JulianDate::new(mean + correction)
}

/// [`true_phase`] for a raw lunation fraction.
///
/// Fails with [`FullMoonError::UnsupportedPhase`] unless `fraction` is within
/// 0.01 of 0, 0.25, 0.5 or 0.75.
pub fn true_phase_fraction(
    k: SynodicIndex,
    fraction: f64,
    fidelity: Fidelity,
) -> Result<JulianDate> {
    let phase = LunarPhase::try_from(fraction)?;
    Ok(true_phase(k, phase, fidelity))
}

fn syzygy_terms(t: f64, m: f64, mp: f64, f: f64, fidelity: Fidelity) -> f64 {
    let leading = (0.1734 - 0.000_393 * t) * dsin(m);
    if fidelity == Fidelity::Legacy {
        return leading;
    }
    leading + 0.0021 * dsin(2.0 * m) - 0.4068 * dsin(mp) + 0.0161 * dsin(2.0 * mp)
        - 0.0004 * dsin(3.0 * mp)
        + 0.0104 * dsin(2.0 * f)
        - 0.0051 * dsin(m + mp)
        - 0.0074 * dsin(m - mp)
        + 0.0004 * dsin(2.0 * f + m)
        - 0.0004 * dsin(2.0 * f - m)
        - 0.0006 * dsin(2.0 * f + mp)
        + 0.0010 * dsin(2.0 * f - mp)
        + 0.0005 * dsin(m + 2.0 * mp)
}

fn quadrature_terms(t: f64, m: f64, mp: f64, f: f64, fidelity: Fidelity) -> f64 {
    let leading = (0.1721 - 0.0004 * t) * dsin(m);
    if fidelity == Fidelity::Legacy {
        return leading;
    }
    leading + 0.0021 * dsin(2.0 * m) - 0.6280 * dsin(mp) + 0.0089 * dsin(2.0 * mp)
        - 0.0004 * dsin(3.0 * mp)
        + 0.0079 * dsin(2.0 * f)
        - 0.0119 * dsin(m + mp)
        - 0.0047 * dsin(m - mp)
        + 0.0003 * dsin(2.0 * f + m)
        - 0.0004 * dsin(2.0 * f - m)
        - 0.0006 * dsin(2.0 * f + mp)
        + 0.0021 * dsin(2.0 * f - mp)
        + 0.0003 * dsin(m + 2.0 * mp)
        + 0.0004 * dsin(m - 2.0 * mp)
        - 0.0003 * dsin(2.0 * m + mp)
}
