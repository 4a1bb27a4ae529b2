// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Full moon dates
//!
//! Finds the instants of full moon following a date and decides whether a
//! given day is a full-moon day, using low-precision lunar theory (Meeus'
//! phase tables plus a Duffett-Smith Sun/Moon ephemeris).
//!
//! # Core types
//!
//! - [`NextFullMoon`]: stateful iterator over successive full moons.
//! - [`IsFullMoon`]: full-moon classifier for a single day.
//! - [`LunarConfig`]: search tunables and the [`Fidelity`] mode.
//! - [`EphemerisSample`]: illumination, age and distances at an instant.
//! - [`LunarPhase`] / [`PhaseEvent`]: the four principal phases and when they occur.
//! - [`Time<S>`]: generic instant parameterised by a [`TimeScale`] marker.
//! - [`JulianDate`]: type alias for `Time<JD>`.
//! - [`Period<S>`]: a time interval parameterised by a [`TimeScale`] marker.
//!
//! # Quick start
//!
//! ```
//! use fullmoon::{IsFullMoon, NextFullMoon};
//!
//! let mut moons = NextFullMoon::new();
//! moons.set_origin_date_string("2024-01-01").unwrap();
//! let full = moons.advance().unwrap();
//! assert_eq!(full.format("%Y-%m-%d %H:%M").to_string(), "2024-01-25 17:54");
//!
//! let mut day = IsFullMoon::new();
//! day.set_date_string("2024-01-26").unwrap();
//! assert!(day.is_full_moon().unwrap());
//! ```
//!
//! # Time axis
//!
//! All instants are UTC seconds since the Unix epoch at the API boundary and
//! Julian Dates internally (`jd = seconds / 86400 + 2440587.5`). No ΔT or
//! leap-second correction is applied.

mod config;
pub mod ephemeris;
mod error;
pub(crate) mod instant;
mod is_full_moon;
mod julian_date_ext;
mod next_full_moon;
mod period;
pub mod phase;
pub(crate) mod scales;
pub mod search;
pub mod timestamp;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use config::{Fidelity, LunarConfig};
pub use ephemeris::EphemerisSample;
pub use error::{FullMoonError, Result};
pub use instant::{Time, TimeInstant, TimeScale};
pub use is_full_moon::IsFullMoon;
pub use julian_date_ext::CalendarDate;
pub use next_full_moon::NextFullMoon;
pub use period::{Interval, Period};
pub use phase::{LunarPhase, SynodicIndex};
pub use scales::{UnixTime, JD};
pub use search::PhaseEvent;
pub use timestamp::Timestamp;

/// Julian Date: continuous count of days since the Julian Period.
///
/// This is a type alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;
