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

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::reading::Reading;

/// Durable, time-keyed storage of readings.
///
/// Implementations are shared between request workers and must bound their
/// own I/O (lock or busy timeouts) rather than block indefinitely.
pub trait ReadingStore: Send + Sync {
    /// Persists one reading. A reading already stored at the same instant is
    /// rejected with [`StoreError::Duplicate`].
    fn append(&self, reading: &Reading) -> Result<(), StoreError>;

    /// Every stored reading in ascending timestamp order.
    fn scan_ascending(&self) -> Result<Vec<Reading>, StoreError>;

    /// Drops all readings.
    fn reset(&self) -> Result<(), StoreError>;

    /// Timestamp of the newest stored reading, filtered or not.
    fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
}

/// Volatile store used by tests. `--memory` runs use SQLite's `:memory:`
/// database instead.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    readings: RwLock<BTreeMap<DateTime<Utc>, Reading>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.readings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.read().is_empty()
    }
}

impl ReadingStore for InMemoryStore {
    fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        match self.readings.write().entry(reading.timestamp) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(reading.timestamp)),
            Entry::Vacant(slot) => {
                slot.insert(*reading);
                Ok(())
            }
        }
    }

    fn scan_ascending(&self) -> Result<Vec<Reading>, StoreError> {
        Ok(self.readings.read().values().copied().collect())
    }

    fn reset(&self) -> Result<(), StoreError> {
        self.readings.write().clear();
        Ok(())
    }

    fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.readings.read().keys().next_back().copied())
    }
}
