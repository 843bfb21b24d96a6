//! Statistics aggregation and threshold alerting.
//!
//! `StatsService` is the entry point used by the web layer and the scheduler.
//! It wires the validator, fetcher, yield aggregator and backfiller around one
//! telemetry source, alert sink and stat store.

mod backfill;
mod fetcher;
mod validator;
mod yield_aggregator;

#[cfg(test)]
pub(crate) mod testing;

pub use backfill::*;
pub use fetcher::*;
pub use validator::*;
pub use yield_aggregator::*;

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use thiserror::Error;

use crate::alert::AlertSink;
use crate::config::AlertThresholds;
use crate::db::{DbError, Site, StatEntry, StatStore};
use crate::source::{MeanYield, PerformanceReading, SourceError, TelemetrySource};

/// Faults from collaborators. Absent data is never an error.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("telemetry source failed: {0}")]
    Source(#[from] SourceError),
    #[error("stat store failed: {0}")]
    Store(#[from] DbError),
}

/// The day before `today`.
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

pub struct StatsService {
    site: Site,
    store: Arc<dyn StatStore>,
    fetcher: Arc<PerformanceFetcher>,
    yields: YieldAggregator,
    backfiller: RangeBackfiller,
}

impl StatsService {
    pub fn new(
        site: Site,
        thresholds: AlertThresholds,
        source: Arc<dyn TelemetrySource>,
        alerts: Arc<dyn AlertSink>,
        store: Arc<dyn StatStore>,
    ) -> Self {
        let validator = PerformanceValidator::new(site.clone(), thresholds, alerts);
        let fetcher = Arc::new(PerformanceFetcher::new(source.clone(), validator));
        let yields = YieldAggregator::new(source, fetcher.clone());
        let backfiller = RangeBackfiller::new(site.clone(), fetcher.clone(), store.clone());

        Self {
            site,
            store,
            fetcher,
            yields,
            backfiller,
        }
    }

    /// Current mean energy yield, if any source has one.
    pub async fn current_mean_yield(&self) -> Result<Option<MeanYield>, StatsError> {
        Ok(self.yields.current_mean_yield().await?)
    }

    /// Performance for an arbitrary window.
    pub async fn performance(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Option<PerformanceReading>, StatsError> {
        Ok(self.fetcher.fetch(from, to).await?)
    }

    /// Yesterday's performance, or a placeholder stamped with yesterday's midnight.
    pub async fn yesterday_performance(&self) -> Result<PerformanceReading, StatsError> {
        self.day_performance(yesterday(Local::now().date_naive())).await
    }

    /// Performance for a whole day, or a placeholder stamped with its midnight.
    pub async fn day_performance(&self, day: NaiveDate) -> Result<PerformanceReading, StatsError> {
        let (from, to) = day_window(day);

        Ok(self.fetcher.fetch(from, to).await?.unwrap_or_else(|| {
            tracing::warn!("No performance data available for {}, returning empty data", day);
            PerformanceReading::placeholder(from)
        }))
    }

    /// Persist daily performance rows for every day in `from..=to` that has data.
    pub async fn log_performance(&self, from: NaiveDate, to: NaiveDate) -> Result<(), StatsError> {
        self.backfiller.backfill(from, to).await
    }

    /// Persist the current mean energy yield, when there is one.
    pub async fn record_mean_yield(&self) -> Result<Option<MeanYield>, StatsError> {
        let mean = self.current_mean_yield().await?;

        match mean {
            Some(value) => {
                self.store.persist(&StatEntry::generation(&self.site, value))?;
                tracing::info!("Recorded mean energy yield {} for {}", value.value, self.site);
            }
            None => tracing::warn!("No energy yield data available to log"),
        }

        Ok(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MeanYieldResponse;
    use crate::stats::testing::{healthy_reading, window_response, FakeSource, MemoryStore, RecordingAlerts};

    struct Fixture {
        source: Arc<FakeSource>,
        alerts: Arc<RecordingAlerts>,
        store: Arc<MemoryStore>,
        service: StatsService,
    }

    fn fixture() -> Fixture {
        let source = Arc::new(FakeSource::default());
        let alerts = Arc::new(RecordingAlerts::default());
        let store = Arc::new(MemoryStore::default());
        let service = StatsService::new(
            Site::new("GRAIG_FATHA"),
            AlertThresholds::default(),
            source.clone(),
            alerts.clone(),
            store.clone(),
        );
        Fixture {
            source,
            alerts,
            store,
            service,
        }
    }

    #[test]
    fn test_yesterday() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(yesterday(today), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[tokio::test]
    async fn test_yesterday_performance_returns_data() {
        let f = fixture();
        let reading = healthy_reading();
        f.source
            .push_performance(Some(window_response(Some(vec![Some(reading.clone())]))));

        let result = f.service.yesterday_performance().await.unwrap();

        assert_eq!(result, reading);
        assert_eq!(f.source.performance_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_yesterday_performance_placeholder_when_no_data() {
        let f = fixture();
        f.source.push_performance(None);

        let before = yesterday(Local::now().date_naive());
        let result = f.service.yesterday_performance().await.unwrap();
        let after = yesterday(Local::now().date_naive());

        let midnight = result.date.unwrap();
        assert!(midnight == day_window(before).0 || midnight == day_window(after).0);
        assert_eq!(result, PerformanceReading::placeholder(midnight));
        assert_eq!(f.alerts.messages().len(), 1);
        assert!(f.store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_day_performance_placeholder_fields_default() {
        let f = fixture();
        let day = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();

        let result = f.service.day_performance(day).await.unwrap();

        assert_eq!(result.date, Some(day.and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(result.tid, None);
        assert_eq!(result.availability, 0.0);
        assert_eq!(result.energy_yield, 0.0);
        assert_eq!(result.values_count, 0);
        assert_eq!(f.source.performance_calls(), vec![(1_762_300_800, 1_762_387_199)]);
    }

    #[tokio::test]
    async fn test_record_mean_yield_persists_generation_row() {
        let f = fixture();
        f.source.set_mean_yield(Some(MeanYieldResponse {
            data: Some(MeanYield { value: 88.5 }),
        }));

        let recorded = f.service.record_mean_yield().await.unwrap();

        assert_eq!(recorded, Some(MeanYield { value: 88.5 }));
        let entries = f.store.entries();
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            StatEntry::Generation(entry) => {
                assert_eq!(entry.value, 88.5);
                assert_eq!(entry.site, Site::new("GRAIG_FATHA"));
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_record_mean_yield_persists_nothing_when_absent() {
        let f = fixture();

        let recorded = f.service.record_mean_yield().await.unwrap();

        assert!(recorded.is_none());
        assert!(f.store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_log_performance_delegates_to_backfill() {
        let f = fixture();
        f.source
            .push_performance(Some(window_response(Some(vec![Some(healthy_reading())]))));
        let day = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();

        f.service.log_performance(day, day).await.unwrap();

        assert_eq!(f.store.performance_days(), vec![day]);
    }
}
