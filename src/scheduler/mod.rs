//! Scheduler module for the periodic logging jobs.

mod jobs;

pub use jobs::*;

use crate::config::ServerConfig;
use crate::stats::StatsService;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{Instant, MissedTickBehavior};

/// Runs each job on its own fixed period until stopped.
pub struct Scheduler {
    service: Arc<StatsService>,
    energy_yield_interval: Duration,
    performance_interval: Duration,
    stop: Arc<Mutex<Option<broadcast::Sender<()>>>>,
}

impl Scheduler {
    pub fn new(service: Arc<StatsService>, cfg: &ServerConfig) -> Self {
        Self {
            service,
            energy_yield_interval: cfg.energy_yield_interval,
            performance_interval: cfg.performance_interval,
            stop: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the job loops. Calling it again while running is a no-op.
    pub async fn start(&self) {
        let mut stop = self.stop.lock().await;
        if stop.is_some() {
            return;
        }

        let (tx, _) = broadcast::channel(1);

        tracing::info!(
            "Starting scheduler: energy yield every {:?}, performance every {:?}",
            self.energy_yield_interval,
            self.performance_interval
        );

        tokio::spawn(run_job_loop(
            Job::EnergyYield,
            self.service.clone(),
            self.energy_yield_interval,
            tx.subscribe(),
        ));
        tokio::spawn(run_job_loop(
            Job::Performance,
            self.service.clone(),
            self.performance_interval,
            tx.subscribe(),
        ));

        *stop = Some(tx);
    }

    /// Stop the job loops.
    pub async fn stop(&self) {
        if let Some(tx) = self.stop.lock().await.take() {
            let _ = tx.send(());
            tracing::info!("Scheduler stopped");
        }
    }
}

/// Run `job` every `period`, first firing one period after start.
async fn run_job_loop(
    job: Job,
    service: Arc<StatsService>,
    period: Duration,
    mut stop_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = stop_rx.recv() => break,
            _ = interval.tick() => {
                tracing::info!("{} job running", job);
                if let Err(e) = job.run(&service).await {
                    tracing::error!("{} job failed: {}", job, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlertThresholds;
    use crate::db::Site;
    use crate::source::{MeanYield, MeanYieldResponse};
    use crate::stats::testing::{FakeSource, MemoryStore, RecordingAlerts};

    #[tokio::test(start_paused = true)]
    async fn test_jobs_fire_on_their_periods_until_stopped() {
        let source = Arc::new(FakeSource::default());
        source.set_mean_yield(Some(MeanYieldResponse {
            data: Some(MeanYield { value: 10.0 }),
        }));
        let store = Arc::new(MemoryStore::default());
        let service = Arc::new(StatsService::new(
            Site::new("GRAIG_FATHA"),
            AlertThresholds::default(),
            source.clone(),
            Arc::new(RecordingAlerts::default()),
            store.clone(),
        ));

        let cfg = ServerConfig {
            energy_yield_interval: Duration::from_secs(60),
            performance_interval: Duration::from_secs(3600),
            ..Default::default()
        };
        let scheduler = Scheduler::new(service, &cfg);
        scheduler.start().await;
        scheduler.start().await;

        // Nothing runs at startup.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.mean_yield_calls(), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.mean_yield_calls(), 2);
        assert_eq!(store.entries().len(), 2);
        assert!(source.performance_calls().is_empty());

        scheduler.stop().await;
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.mean_yield_calls(), 2);
    }
}
