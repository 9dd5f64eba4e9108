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

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{ErrorCode, params};

use thermolog_core::{Reading, ReadingStore, StoreError};

/// SQLite-backed reading store.
///
/// Timestamps are kept as microseconds since the Unix epoch so the primary
/// key orders rows by time. SQLite turns NaN into NULL, so the value columns
/// are nullable and NULL reads back as NaN.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<rusqlite::Connection>,
    lock_timeout: Duration,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`. `":memory:"` gives a private
    /// in-memory database. `timeout` bounds both SQLite's busy wait and the
    /// wait for the shared connection.
    pub fn open(path: &str, timeout: Duration) -> Result<Self> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open database: {path}"))?;
        conn.busy_timeout(timeout)
            .context("Failed to set database busy timeout")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS readings (
                time_us        INTEGER PRIMARY KEY,
                temp_inside    REAL,
                temp_outside   REAL,
                humidity       REAL
            );",
        )
        .context("Failed to initialize database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
            lock_timeout: timeout,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, StoreError> {
        self.conn
            .try_lock_for(self.lock_timeout)
            .ok_or(StoreError::Timeout(self.lock_timeout))
    }

    pub fn reading_count(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))
            .map_err(StoreError::backend)
    }
}

fn from_micros(time_us: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(time_us)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(0, time_us))
}

impl ReadingStore for SqliteStore {
    fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let conn = self.conn()?;
        match conn.execute(
            "INSERT INTO readings (time_us, temp_inside, temp_outside, humidity)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                reading.timestamp.timestamp_micros(),
                reading.temp_inside,
                reading.temp_outside,
                reading.humidity,
            ],
        ) {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Duplicate(reading.timestamp))
            }
            Err(e) => Err(StoreError::backend(e)),
        }
    }

    fn scan_ascending(&self) -> Result<Vec<Reading>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT time_us, temp_inside, temp_outside, humidity
                 FROM readings ORDER BY time_us ASC",
            )
            .map_err(StoreError::backend)?;

        stmt.query_map([], |row| {
            let value = |idx: usize| -> rusqlite::Result<f64> {
                Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(f64::NAN))
            };
            Ok(Reading {
                timestamp: from_micros(row.get(0)?)?,
                temp_inside: value(1)?,
                temp_outside: value(2)?,
                humidity: value(3)?,
            })
        })
        .and_then(Iterator::collect)
        .map_err(StoreError::backend)
    }

    fn reset(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM readings", [])
            .map_err(StoreError::backend)?;
        Ok(())
    }

    fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let conn = self.conn()?;
        let latest: Option<i64> = conn
            .query_row("SELECT MAX(time_us) FROM readings", [], |row| row.get(0))
            .map_err(StoreError::backend)?;
        latest
            .map(from_micros)
            .transpose()
            .map_err(StoreError::backend)
    }
}
