//! Current mean energy yield with a performance fallback.

use std::sync::Arc;

use super::PerformanceFetcher;
use crate::source::{MeanYield, SourceError, TelemetrySource};

pub struct YieldAggregator {
    source: Arc<dyn TelemetrySource>,
    fetcher: Arc<PerformanceFetcher>,
}

impl YieldAggregator {
    pub fn new(source: Arc<dyn TelemetrySource>, fetcher: Arc<PerformanceFetcher>) -> Self {
        Self { source, fetcher }
    }

    /// Mean yield from the source, else the live reading's energy yield.
    ///
    /// Returns `None` once both are exhausted; no value is ever made up.
    pub async fn current_mean_yield(&self) -> Result<Option<MeanYield>, SourceError> {
        tracing::info!("Fetching current mean energy yield");

        if let Some(mean) = self.mean_energy_yield().await? {
            return Ok(Some(mean));
        }

        tracing::warn!("No mean energy yield data available, falling back to current performance");

        if let Some(mean) = self.current_performance_yield().await? {
            return Ok(Some(mean));
        }

        tracing::warn!("No energy yield available from any source");
        Ok(None)
    }

    async fn mean_energy_yield(&self) -> Result<Option<MeanYield>, SourceError> {
        Ok(self.source.mean_energy_yield().await?.and_then(|resp| resp.data))
    }

    async fn current_performance_yield(&self) -> Result<Option<MeanYield>, SourceError> {
        let reading = self.fetcher.fetch_current().await?;
        Ok(reading.map(|r| MeanYield {
            value: r.energy_yield,
        }))
    }
}
