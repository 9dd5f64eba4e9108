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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One timestamped sensor sample. Immutable once stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub temp_inside: f64,
    pub temp_outside: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(
        timestamp: DateTime<Utc>,
        temp_inside: f64,
        temp_outside: f64,
        humidity: f64,
    ) -> Self {
        Self {
            timestamp,
            temp_inside,
            temp_outside,
            humidity,
        }
    }
}

/// Raw, unparsed ingest parameters as they arrive from the transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingParams {
    pub inside: Option<String>,
    pub outside: Option<String>,
    pub humidity: Option<String>,
}

impl ReadingParams {
    /// Parse the three values and stamp them with `at`.
    ///
    /// Values outside the plausible sensor range are accepted here; they are
    /// stored as sent and dropped later by the sample filter. NaN is likewise
    /// accepted, but values that overflow to infinity are rejected.
    pub fn into_reading(self, at: DateTime<Utc>) -> Result<Reading, ValidationError> {
        Ok(Reading {
            timestamp: at,
            temp_inside: parse_param("inside", self.inside.as_deref())?,
            temp_outside: parse_param("outside", self.outside.as_deref())?,
            humidity: parse_param("humidity", self.humidity.as_deref())?,
        })
    }
}

fn parse_param(name: &'static str, raw: Option<&str>) -> Result<f64, ValidationError> {
    let raw = raw.ok_or(ValidationError::Missing(name))?.trim();
    let value: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| {
        ValidationError::Invalid {
            name,
            reason: format!("{e}: {raw:?}"),
        }
    })?;
    if value.is_infinite() {
        return Err(ValidationError::Invalid {
            name,
            reason: format!("value out of range: {raw:?}"),
        });
    }
    Ok(value)
}
