//! Day-by-day replay of fetch, validate and persist.

use chrono::NaiveDate;
use std::sync::Arc;

use super::{day_window, PerformanceFetcher, StatsError};
use crate::db::{Site, StatEntry, StatStore};

pub struct RangeBackfiller {
    site: Site,
    fetcher: Arc<PerformanceFetcher>,
    store: Arc<dyn StatStore>,
}

impl RangeBackfiller {
    pub fn new(site: Site, fetcher: Arc<PerformanceFetcher>, store: Arc<dyn StatStore>) -> Self {
        Self { site, fetcher, store }
    }

    /// Persist one performance row per day in `from..=to` that has data.
    ///
    /// Days without data are skipped. A `from` after `to` processes nothing.
    /// Source and store faults abort the run.
    pub async fn backfill(&self, from: NaiveDate, to: NaiveDate) -> Result<(), StatsError> {
        tracing::info!("Backfilling performance for {} from {} to {}", self.site, from, to);

        let mut persisted = 0usize;
        let mut skipped = 0usize;

        for day in from.iter_days().take_while(|day| *day <= to) {
            let (start, end) = day_window(day);

            match self.fetcher.fetch(start, end).await? {
                Some(reading) => {
                    self.store
                        .persist(&StatEntry::performance(&self.site, day, reading))?;
                    persisted += 1;
                    tracing::info!("Persisted performance data for date: {}", day);
                }
                None => {
                    skipped += 1;
                    tracing::warn!("No valid performance data available for date: {}", day);
                }
            }
        }

        tracing::info!(
            "Backfill for {} finished: {} persisted, {} skipped",
            self.site,
            persisted,
            skipped
        );
        Ok(())
    }
}
