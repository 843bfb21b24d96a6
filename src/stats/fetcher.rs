//! Performance window queries.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;

use super::PerformanceValidator;
use crate::source::{PerformanceQueryResult, PerformanceReading, SourceError, TelemetrySource};

/// Local midnight to the last nanosecond of `date`.
pub fn day_window(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or(start);
    (start, end)
}

/// Seconds since the epoch, reading the local time as UTC.
pub fn epoch_seconds(time: NaiveDateTime) -> i64 {
    time.and_utc().timestamp()
}

/// Fetches performance windows, validating everything except live polls.
pub struct PerformanceFetcher {
    source: Arc<dyn TelemetrySource>,
    validator: PerformanceValidator,
}

impl PerformanceFetcher {
    pub fn new(source: Arc<dyn TelemetrySource>, validator: PerformanceValidator) -> Self {
        Self { source, validator }
    }

    /// Fetch and validate the reading for a window.
    ///
    /// Alerts go out before the result is interpreted, including for absent data.
    pub async fn fetch(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Option<PerformanceReading>, SourceError> {
        tracing::info!("Fetching performance from {} to {}", from, to);

        let response = self
            .source
            .performance(epoch_seconds(from), epoch_seconds(to))
            .await?;
        let result = PerformanceQueryResult::from_response(response);

        self.validator.validate(&result).await;

        if let Err(absence) = result.reading() {
            tracing::warn!(
                "No performance data available for period {} to {}: {}",
                from,
                to,
                absence
            );
        }

        Ok(result.into_reading())
    }

    /// Fetch the live reading. Never raises alerts.
    pub async fn fetch_current(&self) -> Result<Option<PerformanceReading>, SourceError> {
        tracing::info!("Fetching current performance");

        let result = PerformanceQueryResult::from_response(self.source.current_performance().await?);

        if let Err(absence) = result.reading() {
            tracing::warn!("No current performance data available: {}", absence);
        }

        Ok(result.into_reading())
    }
}
