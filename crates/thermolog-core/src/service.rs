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

//! Operations exposed to the transport layer.
//!
//! Every mutation commits to the store first and invalidates the render
//! cache before returning, so a caller that got `Ok` from `ingest` or
//! `reset_all` can never be served a chart that predates its write. A failed
//! mutation leaves the cache untouched.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use crate::aggregate::SeriesAggregator;
use crate::error::Result;
use crate::filter;
use crate::pipeline::{ChartOutcome, RenderPipeline};
use crate::reading::{Reading, ReadingParams};
use crate::render::ChartRenderer;
use crate::store::ReadingStore;

#[derive(Debug)]
pub struct ReadingService<S, R> {
    pipeline: RenderPipeline<S, R>,
}

impl<S, R> ReadingService<S, R>
where
    S: ReadingStore,
    R: ChartRenderer,
{
    pub fn new(store: Arc<S>, renderer: R, aggregator: SeriesAggregator) -> Self {
        Self {
            pipeline: RenderPipeline::new(store, renderer, aggregator),
        }
    }

    pub fn pipeline(&self) -> &RenderPipeline<S, R> {
        &self.pipeline
    }

    /// Validates raw parameters, stamps them with `at` and stores the reading.
    pub fn ingest(&self, params: ReadingParams, at: DateTime<Utc>) -> Result<Reading> {
        let reading = params.into_reading(at)?;
        self.append(&reading)?;
        Ok(reading)
    }

    pub fn append(&self, reading: &Reading) -> Result<()> {
        self.pipeline.store().append(reading)?;
        self.pipeline.cache().invalidate();
        debug!(
            timestamp = %reading.timestamp,
            inside = reading.temp_inside,
            outside = reading.temp_outside,
            humidity = reading.humidity,
            plausible = filter::accept(reading),
            "Reading stored"
        );
        Ok(())
    }

    pub fn chart(&self) -> Result<ChartOutcome> {
        self.pipeline.render_chart()
    }

    /// Plausible readings as three lines (inside, outside, humidity), each
    /// value written as ` {:.2}`. Outdoor values are not baseline-aligned.
    /// `None` when no reading passes the filter.
    pub fn raw_dump(&self) -> Result<Option<String>> {
        let retained = filter::retain_plausible(self.pipeline.store().scan_ascending()?);
        if retained.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_dump(&retained)))
    }

    pub fn reset_all(&self) -> Result<()> {
        self.pipeline.store().reset()?;
        self.pipeline.cache().invalidate();
        info!("All readings dropped");
        Ok(())
    }

    /// Time elapsed since the newest stored reading, clamped at zero.
    pub fn last_update_age(&self, now: DateTime<Utc>) -> Result<Option<TimeDelta>> {
        let latest = self.pipeline.store().latest_timestamp()?;
        Ok(latest.map(|at| now.signed_duration_since(at).max(TimeDelta::zero())))
    }
}

fn format_dump(readings: &[Reading]) -> String {
    let mut inside = String::new();
    let mut outside = String::new();
    let mut humidity = String::new();
    for r in readings {
        // Writing into a String cannot fail.
        let _ = write!(inside, " {:.2}", r.temp_inside);
        let _ = write!(outside, " {:.2}", r.temp_outside);
        let _ = write!(humidity, " {:.2}", r.humidity);
    }
    format!("{inside}\n{outside}\n{humidity}")
}
