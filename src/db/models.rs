//! Database model types.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use crate::source::{MeanYield, PerformanceReading};

/// Identifier of a physical installation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site(String);

impl Site {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted daily performance reading.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceStatEntry {
    pub site: Site,
    /// Day the reading covers
    pub observed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub reading: PerformanceReading,
}

/// A persisted mean energy yield sample.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStatEntry {
    pub site: Site,
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

/// Append-only historical record.
#[derive(Debug, Clone, PartialEq)]
pub enum StatEntry {
    Performance(PerformanceStatEntry),
    Generation(GenerationStatEntry),
}

impl StatEntry {
    pub fn performance(site: &Site, observed_on: NaiveDate, reading: PerformanceReading) -> Self {
        StatEntry::Performance(PerformanceStatEntry {
            site: site.clone(),
            observed_on,
            created_at: Utc::now(),
            reading,
        })
    }

    pub fn generation(site: &Site, mean_yield: MeanYield) -> Self {
        StatEntry::Generation(GenerationStatEntry {
            site: site.clone(),
            created_at: Utc::now(),
            value: mean_yield.value,
        })
    }
}
