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

use askama::Template;

use thermolog_core::{ChartDataset, ChartRenderer, RenderError};

#[derive(Debug, Template)]
#[template(path = "chart.html")]
struct ChartTemplate<'a> {
    title: &'a str,
    points: usize,
    labels_json: String,
    inside_json: String,
    outside_json: String,
    humidity_json: String,
    temp_min: String,
    temp_max: String,
    humidity_min: String,
    humidity_max: String,
}

/// Renders a dataset as a self-contained Chart.js page.
///
/// Axis bounds are written at full precision, like the series, so every
/// plotted point stays inside the padded axis.
#[derive(Debug, Clone)]
pub struct HtmlChartRenderer {
    title: String,
}

impl HtmlChartRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    serde_json::to_string(value).map_err(|e| RenderError::Template(Box::new(e)))
}

impl ChartRenderer for HtmlChartRenderer {
    fn render(&self, dataset: &ChartDataset) -> Result<String, RenderError> {
        if dataset.is_empty() {
            return Err(RenderError::MalformedDataset(
                "refusing to render an empty dataset".to_owned(),
            ));
        }
        if !dataset.is_well_formed() {
            return Err(RenderError::MalformedDataset(format!(
                "series lengths differ or contain non-finite values ({} labels)",
                dataset.len()
            )));
        }

        let template = ChartTemplate {
            title: &self.title,
            points: dataset.len(),
            labels_json: to_json(&dataset.labels)?,
            inside_json: to_json(&dataset.series_inside)?,
            outside_json: to_json(&dataset.series_outside)?,
            humidity_json: to_json(&dataset.series_humidity)?,
            temp_min: to_json(&dataset.temp_axis.min)?,
            temp_max: to_json(&dataset.temp_axis.max)?,
            humidity_min: to_json(&dataset.humidity_axis.min)?,
            humidity_max: to_json(&dataset.humidity_axis.max)?,
        };
        template
            .render()
            .map_err(|e| RenderError::Template(Box::new(e)))
    }
}
