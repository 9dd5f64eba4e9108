// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Rejection of physically implausible samples.
//!
//! The sensor hardware occasionally emits out-of-range values or NaN. Such
//! samples are dropped from every derived output before aggregation so they
//! cannot skew the axis bounds or the baseline offset.

use std::ops::RangeInclusive;

use crate::reading::Reading;

/// Plausible range for both temperature channels, in °C.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 2.0..=40.0;

/// Upper humidity bound in %. The lower bound is exclusive: 0 % is a glitch.
pub const HUMIDITY_MAX: f64 = 100.0;

/// Returns `true` when every channel of `reading` lies in its plausible range.
///
/// NaN never lies inside a range, so a NaN in any channel rejects the sample.
pub fn accept(reading: &Reading) -> bool {
    TEMPERATURE_RANGE.contains(&reading.temp_inside)
        && TEMPERATURE_RANGE.contains(&reading.temp_outside)
        && reading.humidity > 0.0
        && reading.humidity <= HUMIDITY_MAX
}

/// Keeps the accepted readings, preserving their order.
pub fn retain_plausible(readings: Vec<Reading>) -> Vec<Reading> {
    readings.into_iter().filter(accept).collect()
}
