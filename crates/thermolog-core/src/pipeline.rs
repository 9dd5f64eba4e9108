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

use std::sync::Arc;

use tracing::debug;

use crate::aggregate::SeriesAggregator;
use crate::cache::RenderCache;
use crate::error::Result;
use crate::filter;
use crate::render::ChartRenderer;
use crate::store::ReadingStore;

/// Result of a chart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Rendered(Arc<str>),
    /// No reading survived the sample filter. Nothing was rendered or cached.
    Empty,
}

/// Store scan -> sample filter -> aggregation -> render, memoized in a
/// [`RenderCache`].
#[derive(Debug)]
pub struct RenderPipeline<S, R> {
    store: Arc<S>,
    renderer: R,
    aggregator: SeriesAggregator,
    cache: RenderCache,
}

impl<S, R> RenderPipeline<S, R>
where
    S: ReadingStore,
    R: ChartRenderer,
{
    pub fn new(store: Arc<S>, renderer: R, aggregator: SeriesAggregator) -> Self {
        Self {
            store,
            renderer,
            aggregator,
            cache: RenderCache::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Serves the cached chart, or rebuilds it from the full history.
    ///
    /// The rebuild runs without holding the cache lock, so concurrent misses
    /// may render redundantly; only a result computed from the current store
    /// generation is kept.
    pub fn render_chart(&self) -> Result<ChartOutcome> {
        if let Some(artifact) = self.cache.get() {
            debug!("Chart cache hit");
            return Ok(ChartOutcome::Rendered(artifact));
        }

        let observed = self.cache.generation();
        let readings = self.store.scan_ascending()?;
        let scanned = readings.len();
        let retained = filter::retain_plausible(readings);
        debug!(
            scanned,
            retained = retained.len(),
            generation = observed,
            "Chart cache miss, rebuilding"
        );

        let dataset = self.aggregator.aggregate(&retained);
        if dataset.is_empty() {
            return Ok(ChartOutcome::Empty);
        }

        let artifact: Arc<str> = Arc::from(self.renderer.render(&dataset)?);
        self.cache.put(observed, Arc::clone(&artifact), dataset);
        Ok(ChartOutcome::Rendered(artifact))
    }
}
