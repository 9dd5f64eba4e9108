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

//! Sensor reading aggregation and chart caching.
//!
//! Readings flow through [`filter`] and [`aggregate`] into a [`ChartDataset`]
//! which a [`ChartRenderer`] turns into the served artifact. The
//! [`RenderCache`] keeps the last artifact until the store changes.

pub mod aggregate;
pub mod cache;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod reading;
pub mod render;
pub mod service;
pub mod store;

pub use aggregate::SeriesAggregator;
pub use cache::{CacheEntry, RenderCache};
pub use dataset::{AxisBounds, ChartDataset};
pub use error::{RenderError, Result, StoreError, ThermologError, ValidationError};
pub use pipeline::{ChartOutcome, RenderPipeline};
pub use reading::{Reading, ReadingParams};
pub use render::ChartRenderer;
pub use service::ReadingService;
pub use store::{InMemoryStore, ReadingStore};
