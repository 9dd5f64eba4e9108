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

//! Memoized chart output for the whole reading history.
//!
//! The cache holds at most one entry. Every store mutation bumps the
//! generation counter and clears the entry; a miss records the generation it
//! observed before scanning the store, and `put` refuses the result if a
//! mutation happened in between. A rendered chart is therefore never served
//! once a later write has been acknowledged.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::dataset::ChartDataset;

/// Identifies the store state a cache entry was computed from.
pub type Generation = u64;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub artifact: Arc<str>,
    pub dataset: Arc<ChartDataset>,
    pub generation: Generation,
}

#[derive(Debug, Default)]
struct CacheState {
    generation: Generation,
    entry: Option<CacheEntry>,
}

#[derive(Debug, Default)]
pub struct RenderCache {
    state: RwLock<CacheState>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<str>> {
        self.state
            .read()
            .entry
            .as_ref()
            .map(|entry| Arc::clone(&entry.artifact))
    }

    /// The cached artifact together with the dataset it was rendered from.
    pub fn entry(&self) -> Option<CacheEntry> {
        self.state.read().entry.clone()
    }

    /// Generation to capture before reading the store on a miss.
    pub fn generation(&self) -> Generation {
        self.state.read().generation
    }

    /// Stores a freshly rendered chart computed from the store as it was at
    /// `observed`. Returns `false` and drops the entry if the store has been
    /// mutated since.
    pub fn put(&self, observed: Generation, artifact: Arc<str>, dataset: ChartDataset) -> bool {
        let mut state = self.state.write();
        if state.generation != observed {
            debug!(
                observed,
                current = state.generation,
                "Discarding chart rendered from a superseded store state"
            );
            return false;
        }
        state.entry = Some(CacheEntry {
            artifact,
            dataset: Arc::new(dataset),
            generation: observed,
        });
        true
    }

    /// Clears the entry and supersedes every in-flight miss.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.generation = state.generation.wrapping_add(1);
        state.entry = None;
    }
}
