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
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use chrono::{TimeDelta, Utc};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use thermolog_core::{ChartOutcome, ReadingParams, ReadingService, StoreError, ThermologError};

use crate::chart::HtmlChartRenderer;
use crate::db::SqliteStore;

pub type Service = ReadingService<SqliteStore, HtmlChartRenderer>;

pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<Service>,
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] ThermologError),

    #[error("request worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Core(ThermologError::Validation(e)) => {
                debug!(error = %e, "Rejected reading");
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            Self::Core(ThermologError::Store(e)) => {
                error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Store error: {e}"),
                )
                    .into_response()
            }
            Self::Core(ThermologError::Render(e)) => {
                error!(error = %e, "Rendering a non-empty dataset failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error rendering chart: {e}"),
                )
                    .into_response()
            }
            Self::Worker(e) => {
                error!(error = %e, "Request worker failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

/// Runs a blocking service call on the blocking pool, bounded by the
/// request deadline. An overrun is reported as a store timeout.
///
/// The blocking task is not cancelled. A write that overruns the deadline
/// may still commit afterwards and then invalidate the cache, so a 500 here
/// does not mean the reading was discarded.
async fn run<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Service) -> thermolog_core::Result<T> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    let task = tokio::task::spawn_blocking(move || op(&service));
    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(ThermologError::from(StoreError::Timeout(state.request_timeout)).into()),
    }
}

pub async fn chart_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    match run(&state, Service::chart).await? {
        ChartOutcome::Rendered(html) => Ok(Html(html.to_string()).into_response()),
        ChartOutcome::Empty => Ok(NO_DATA.into_response()),
    }
}

pub async fn dump_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(run(&state, Service::raw_dump)
        .await?
        .unwrap_or_else(|| NO_DATA.to_owned()))
}

pub async fn push_handler(
    State(state): State<AppState>,
    Query(params): Query<ReadingParams>,
) -> Result<&'static str, ApiError> {
    let reading = run(&state, move |service| service.ingest(params, Utc::now())).await?;
    info!(
        timestamp = %reading.timestamp,
        inside = reading.temp_inside,
        outside = reading.temp_outside,
        humidity = reading.humidity,
        "Data added"
    );
    Ok("Data added")
}

pub async fn reset_handler(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    run(&state, Service::reset_all).await?;
    Ok("Drop ok")
}

pub async fn last_update_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    let age = run(&state, |service| service.last_update_age(Utc::now())).await?;
    Ok(age.map_or_else(|| NO_DATA.to_owned(), format_age))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn health_handler() -> &'static str {
    "ok"
}

/// `Last update was HH:MM:SS before`, hours not wrapped at a day.
#[expect(
    clippy::integer_division,
    reason = "integer truncation is intentional for clock display"
)]
pub fn format_age(age: TimeDelta) -> String {
    let secs = age.num_seconds().max(0).unsigned_abs();
    format!(
        "Last update was {:02}:{:02}:{:02} before",
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chart_handler))
        .route("/gettemp", get(dump_handler))
        .route("/pushtemp", get(push_handler).post(push_handler))
        .route("/resettemp", get(reset_handler).post(reset_handler))
        .route("/lastupdate", get(last_update_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
