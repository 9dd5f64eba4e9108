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

use crate::dataset::ChartDataset;
use crate::error::RenderError;

/// Presentation layer turning a dataset into the served artifact.
///
/// Only ever called with a non-empty, well-formed dataset.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, dataset: &ChartDataset) -> Result<String, RenderError>;
}
