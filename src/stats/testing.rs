//! In-memory collaborators for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::alert::AlertSink;
use crate::db::{DbError, Site, StatEntry, StatStore};
use crate::source::{
    MeanYieldResponse, PerformanceReading, PerformanceResponse, SourceError, TelemetrySource,
};

/// A reading inside every default threshold.
pub fn healthy_reading() -> PerformanceReading {
    PerformanceReading {
        tid: Some("GF-1".to_string()),
        availability: 98.0,
        energy_yield: 2500.0,
        power_avg: 104.0,
        power_max: 225.0,
        wind_avg: 6.2,
        wind_max: 14.8,
        values_count: 144,
        power_production_time: 79_000.0,
        fire_time: 0.0,
        comm_failure_time: 20.0,
        grid_failure_time: 0.0,
        error_time: 50.0,
        ..Default::default()
    }
}

/// A response echoing a fixed window around `data`.
pub fn window_response(data: Option<Vec<Option<PerformanceReading>>>) -> PerformanceResponse {
    PerformanceResponse {
        from: Some("2025-11-05T00:00:00".to_string()),
        to: Some("2025-11-05T23:59:59".to_string()),
        data,
    }
}

#[derive(Default)]
struct SourceState {
    mean_yield: Option<MeanYieldResponse>,
    current: Option<PerformanceResponse>,
    performance: VecDeque<Option<PerformanceResponse>>,
    fail_mean_yield: bool,
    fail_performance: bool,
    mean_yield_calls: usize,
    current_calls: usize,
    performance_calls: Vec<(i64, i64)>,
}

/// Scripted telemetry source. Queued performance responses are served in order;
/// once the queue is empty every call gets a null response.
#[derive(Default)]
pub struct FakeSource {
    state: Mutex<SourceState>,
}

impl FakeSource {
    pub fn set_mean_yield(&self, response: Option<MeanYieldResponse>) {
        self.state.lock().unwrap().mean_yield = response;
    }

    pub fn set_current(&self, response: Option<PerformanceResponse>) {
        self.state.lock().unwrap().current = response;
    }

    pub fn push_performance(&self, response: Option<PerformanceResponse>) {
        self.state.lock().unwrap().performance.push_back(response);
    }

    pub fn fail_mean_yield(&self) {
        self.state.lock().unwrap().fail_mean_yield = true;
    }

    pub fn fail_performance(&self) {
        self.state.lock().unwrap().fail_performance = true;
    }

    pub fn mean_yield_calls(&self) -> usize {
        self.state.lock().unwrap().mean_yield_calls
    }

    pub fn current_calls(&self) -> usize {
        self.state.lock().unwrap().current_calls
    }

    pub fn performance_calls(&self) -> Vec<(i64, i64)> {
        self.state.lock().unwrap().performance_calls.clone()
    }
}

#[async_trait]
impl TelemetrySource for FakeSource {
    async fn mean_energy_yield(&self) -> Result<Option<MeanYieldResponse>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.mean_yield_calls += 1;
        if state.fail_mean_yield {
            return Err(SourceError::Network("connection refused".to_string()));
        }
        Ok(state.mean_yield.clone())
    }

    async fn performance(&self, from: i64, to: i64) -> Result<Option<PerformanceResponse>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.performance_calls.push((from, to));
        if state.fail_performance {
            return Err(SourceError::Network("connection refused".to_string()));
        }
        Ok(state.performance.pop_front().flatten())
    }

    async fn current_performance(&self) -> Result<Option<PerformanceResponse>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.current_calls += 1;
        Ok(state.current.clone())
    }
}

/// Alert sink that keeps every alert.
#[derive(Default)]
pub struct RecordingAlerts {
    sent: Mutex<Vec<(Site, String)>>,
}

impl RecordingAlerts {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn sites(&self) -> Vec<Site> {
        self.sent.lock().unwrap().iter().map(|(s, _)| s.clone()).collect()
    }
}

#[async_trait]
impl AlertSink for RecordingAlerts {
    async fn send_alert(&self, site: &Site, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((site.clone(), message.to_string()));
    }
}

/// Stat store backed by a vector.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<StatEntry>>,
    fail: Mutex<bool>,
}

impl MemoryStore {
    pub fn fail_writes(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn entries(&self) -> Vec<StatEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn performance_days(&self) -> Vec<NaiveDate> {
        self.entries()
            .iter()
            .filter_map(|entry| match entry {
                StatEntry::Performance(e) => Some(e.observed_on),
                StatEntry::Generation(_) => None,
            })
            .collect()
    }
}

impl StatStore for MemoryStore {
    fn persist(&self, entry: &StatEntry) -> Result<(), DbError> {
        if *self.fail.lock().unwrap() {
            return Err(DbError::Lock);
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
