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

pub mod chart;
pub mod config;
pub mod db;
pub mod routes;

use std::sync::Arc;

use anyhow::Result;
use thermolog_core::{ReadingService, SeriesAggregator};

use crate::chart::HtmlChartRenderer;
use crate::config::ServerConfig;
use crate::db::SqliteStore;
use crate::routes::{AppState, Service};

/// Opens the store and wires the reading service described by `config`.
pub fn build_service(config: &ServerConfig) -> Result<Service> {
    let store = Arc::new(SqliteStore::open(
        &config.database.path,
        config.busy_timeout(),
    )?);
    Ok(ReadingService::new(
        store,
        HtmlChartRenderer::new(config.display.title.clone()),
        SeriesAggregator::new(config.label_offset()?),
    ))
}

pub fn app_state(config: &ServerConfig) -> Result<AppState> {
    Ok(AppState {
        service: Arc::new(build_service(config)?),
        request_timeout: config.request_timeout(),
    })
}
