//! SQLite database store implementation.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use super::models::*;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Database lock poisoned")]
    Lock,
}

/// Durable append-only destination for stat rows.
pub trait StatStore: Send + Sync {
    fn persist(&self, entry: &StatEntry) -> Result<(), DbError>;
}

/// Thread-safe database store.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Create a new store with the given database path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init()?;
        Ok(store)
    }

    /// Initialize the database with migrations.
    fn init(&self) -> Result<(), DbError> {
        let conn = self.conn()?;

        conn.execute_batch(include_str!("../../migrations/000001_init.up.sql"))
            .map_err(|e| DbError::Migration(format!("Migration 1 failed: {}", e)))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::Lock)
    }

    // --- Performance stats ---

    /// Append a performance row.
    pub fn add_performance_stat(&self, entry: &PerformanceStatEntry) -> Result<i64, DbError> {
        let r = &entry.reading;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO performance_stats (
                site, observed_on, created_at, tid, window_start,
                availability, energy_yield, power_avg, power_max, wind_avg, wind_max,
                values_count, error_count,
                power_production_time, low_wind_time, error_time, service_time, ice_time,
                storm_time, shadow_time, twist_time, grid_failure_time, comm_failure_time,
                visit_time, server_stop_time, fire_time, bat_monitoring_time, night_shutdown_time
             ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28
             )",
            params![
                entry.site.as_str(),
                entry.observed_on.format(DATE_FORMAT).to_string(),
                entry.created_at.format(TIME_FORMAT).to_string(),
                r.tid,
                r.date.map(|d| d.format(TIME_FORMAT).to_string()),
                r.availability,
                r.energy_yield,
                r.power_avg,
                r.power_max,
                r.wind_avg,
                r.wind_max,
                r.values_count,
                r.error_count,
                r.power_production_time,
                r.low_wind_time,
                r.error_time,
                r.service_time,
                r.ice_time,
                r.storm_time,
                r.shadow_time,
                r.twist_time,
                r.grid_failure_time,
                r.comm_failure_time,
                r.visit_time,
                r.server_stop_time,
                r.fire_time,
                r.bat_monitoring_time,
                r.night_shutdown_time,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // --- Generation stats ---

    /// Append a mean energy yield row.
    pub fn add_generation_stat(&self, entry: &GenerationStatEntry) -> Result<i64, DbError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO generation_stats (site, created_at, value) VALUES (?1, ?2, ?3)",
            params![
                entry.site.as_str(),
                entry.created_at.format(TIME_FORMAT).to_string(),
                entry.value,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

impl StatStore for Store {
    fn persist(&self, entry: &StatEntry) -> Result<(), DbError> {
        match entry {
            StatEntry::Performance(e) => self.add_performance_stat(e)?,
            StatEntry::Generation(e) => self.add_generation_stat(e)?,
        };
        Ok(())
    }
}
