// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Search and ephemeris configuration.
//!
//! [`LunarConfig`] gathers the tunables of the phase search: solver bounds,
//! window sizes, the default date pattern and the [`Fidelity`] mode.
//!
//! # Fidelity
//!
//! Earlier releases of this library evaluated the lunar tables with several
//! arithmetic slips. [`Fidelity::Corrected`] evaluates the formulas as
//! published; [`Fidelity::Legacy`] keeps the slips so results match those
//! releases to the second.
//!
//! | Behaviour | `Corrected` | `Legacy` |
//! |-----------|-------------|----------|
//! | Kepler solver | Newton iteration to tolerance | single Newton step |
//! | Periodic series in true phase | every term summed | leading term only |
//! | Mean phase polynomial | full polynomial | leading term only |
//! | Synodic month | 29.530 588 68 d | 29.5305 d |
//! | Full-moon test | `Full` event with illumination ≈ 1 | any event with illumination ≈ 1 |

use qtty::{Day, Days, Seconds};

use crate::error::{FullMoonError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selects between astronomically correct and historically faithful arithmetic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Fidelity {
    /// Evaluate every correction term; iterate Kepler's equation to convergence.
    #[default]
    Corrected,
    /// Reproduce the output of earlier releases bit for bit.
    Legacy,
}

impl Fidelity {
    /// Mean synodic month used by the phase polynomials, in days.
    #[inline]
    pub const fn synodic_month(self) -> Days {
        match self {
            Fidelity::Corrected => Days::new(29.530_588_68),
            Fidelity::Legacy => Days::new(29.5305),
        }
    }
}

/// Tunables for [`NextFullMoon`](crate::NextFullMoon) and
/// [`IsFullMoon`](crate::IsFullMoon).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LunarConfig {
    pub fidelity: Fidelity,
    /// Residual bound for the Newton solver, in radians. Positive.
    pub kepler_tolerance: f64,
    /// At least one.
    pub kepler_max_iterations: usize,
    /// How far before the origin the new-moon bracket search starts,
    /// 0 to 366 days.
    pub lookback_days: f64,
    /// Half-width of the window examined by the full-moon classifier,
    /// above 0 and at most 720 hours.
    pub window_half_width_hours: f64,
    /// chrono pattern used by the date-string setters.
    pub date_format: String,
}

impl LunarConfig {
    pub const DEFAULT_DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Default configuration with the given fidelity.
    pub fn with_fidelity(fidelity: Fidelity) -> Self {
        Self {
            fidelity,
            ..Self::default()
        }
    }

    /// Default configuration reproducing the historical output.
    pub fn legacy() -> Self {
        Self::with_fidelity(Fidelity::Legacy)
    }

    /// Check every field against its documented range.
    ///
    /// The session types run this before each search.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field, value, expected| {
            Err(FullMoonError::InvalidConfig {
                field,
                value,
                expected,
            })
        };
        if !(self.kepler_tolerance > 0.0 && self.kepler_tolerance.is_finite()) {
            return invalid("kepler_tolerance", self.kepler_tolerance, "a positive number");
        }
        if self.kepler_max_iterations == 0 {
            return invalid("kepler_max_iterations", 0.0, "at least 1");
        }
        if !(0.0..=366.0).contains(&self.lookback_days) {
            return invalid("lookback_days", self.lookback_days, "0 to 366");
        }
        if !(self.window_half_width_hours > 0.0 && self.window_half_width_hours <= 720.0) {
            return invalid(
                "window_half_width_hours",
                self.window_half_width_hours,
                "above 0 and at most 720",
            );
        }
        Ok(())
    }

    #[inline]
    pub fn lookback(&self) -> Days {
        Days::new(self.lookback_days)
    }

    #[inline]
    pub fn window_half_width(&self) -> Days {
        Seconds::new(self.window_half_width_hours * 3_600.0).to::<Day>()
    }
}

impl Default for LunarConfig {
    fn default() -> Self {
        Self {
            fidelity: Fidelity::Corrected,
            kepler_tolerance: 1e-6,
            kepler_max_iterations: 64,
            lookback_days: 45.0,
            window_half_width_hours: 12.0,
            date_format: Self::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}
