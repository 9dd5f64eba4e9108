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

use serde::Serialize;

/// Min/max bounds of one chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    /// Starting point of a reduction: the first included value sets both ends.
    pub const fn seed() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Widens both ends by a tenth of the range. A zero-width axis stays as is.
    #[must_use]
    pub fn padded(self) -> Self {
        let pad = self.width() / 10.0;
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Chart-ready view of the retained readings.
///
/// `labels` and the three series are index-aligned and always have the same
/// length. An empty dataset means "no data" and must never be rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub series_inside: Vec<f64>,
    /// Outdoor temperature shifted onto the indoor mean.
    pub series_outside: Vec<f64>,
    pub series_humidity: Vec<f64>,
    pub temp_axis: AxisBounds,
    pub humidity_axis: AxisBounds,
}

impl ChartDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Checks the length invariant and that every value is finite.
    pub fn is_well_formed(&self) -> bool {
        let n = self.labels.len();
        self.series_inside.len() == n
            && self.series_outside.len() == n
            && self.series_humidity.len() == n
            && self
                .series_inside
                .iter()
                .chain(&self.series_outside)
                .chain(&self.series_humidity)
                .all(|v| v.is_finite())
    }
}
