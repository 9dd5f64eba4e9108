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

//! Turns the filtered, time-ordered readings into a [`ChartDataset`].

use chrono::{FixedOffset, Offset, Utc};

use crate::dataset::{AxisBounds, ChartDataset};
use crate::reading::Reading;

const LABEL_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    label_offset: FixedOffset,
}

impl SeriesAggregator {
    /// `label_offset` is the timezone offset applied to the `HH:MM:SS` labels.
    pub fn new(label_offset: FixedOffset) -> Self {
        Self { label_offset }
    }

    /// Builds the dataset from readings that already passed the sample filter.
    ///
    /// The outdoor series is shifted by `mean(inside) - mean(outside)` so both
    /// temperature curves share a baseline on one axis. Axis bounds are taken
    /// over the shifted series and padded by a tenth of their range.
    pub fn aggregate(&self, readings: &[Reading]) -> ChartDataset {
        if readings.is_empty() {
            return ChartDataset::default();
        }

        let (sum_inside, sum_outside) = readings.iter().fold((0.0, 0.0), |(si, so), r| {
            (si + r.temp_inside, so + r.temp_outside)
        });
        #[expect(
            clippy::cast_precision_loss,
            reason = "reading counts stay far below f64 mantissa precision"
        )]
        let count = readings.len() as f64;
        let offset = sum_inside / count - sum_outside / count;

        let mut dataset = ChartDataset {
            labels: Vec::with_capacity(readings.len()),
            series_inside: Vec::with_capacity(readings.len()),
            series_outside: Vec::with_capacity(readings.len()),
            series_humidity: Vec::with_capacity(readings.len()),
            ..ChartDataset::default()
        };
        let mut temp_axis = AxisBounds::seed();
        let mut humidity_axis = AxisBounds::seed();

        for reading in readings {
            let outside = reading.temp_outside + offset;
            temp_axis.include(reading.temp_inside);
            temp_axis.include(outside);
            humidity_axis.include(reading.humidity);

            dataset.labels.push(
                reading
                    .timestamp
                    .with_timezone(&self.label_offset)
                    .format(LABEL_FORMAT)
                    .to_string(),
            );
            dataset.series_inside.push(reading.temp_inside);
            dataset.series_outside.push(outside);
            dataset.series_humidity.push(reading.humidity);
        }

        dataset.temp_axis = temp_axis.padded();
        dataset.humidity_axis = humidity_axis.padded();
        dataset
    }
}

impl Default for SeriesAggregator {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}
