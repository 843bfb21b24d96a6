//! windstats - wind turbine statistics and alerting service
//!
//! Pulls performance telemetry for one site, raises alerts on threshold
//! breaches and keeps a historical record of daily performance and yield.

mod alert;
mod config;
mod db;
mod scheduler;
mod source;
mod stats;
mod web;

use alert::{AlertSink, LogAlertSink, WebhookAlertSink};
use config::ServerConfig;
use db::{Site, Store};
use scheduler::Scheduler;
use source::VensysClient;
use stats::StatsService;
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("windstats=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting windstats for {} on port {}...", cfg.site, cfg.http_port);
    tracing::info!("Using database at {}", cfg.db_path);
    tracing::info!(
        "Alert thresholds: availability {}%, failure time {}s",
        cfg.thresholds.availability,
        cfg.thresholds.failure_time
    );

    // Initialize database
    let store = Arc::new(Store::new(&cfg.db_path)?);
    tracing::info!("Database initialized successfully");

    let source = Arc::new(VensysClient::new(
        &cfg.source_url,
        cfg.source_api_key.clone(),
        cfg.source_timeout,
    )?);

    let alerts: Arc<dyn AlertSink> = match &cfg.alert_webhook_url {
        Some(url) => Arc::new(WebhookAlertSink::new(url, cfg.source_timeout)?),
        None => {
            tracing::info!("No alert webhook configured, alerts will only be logged");
            Arc::new(LogAlertSink)
        }
    };

    let service = Arc::new(StatsService::new(
        Site::new(cfg.site.clone()),
        cfg.thresholds,
        source,
        alerts,
        store,
    ));

    // Start scheduler
    let scheduler = Scheduler::new(service.clone(), &cfg);
    if cfg.scheduler_enabled {
        scheduler.start().await;
    } else {
        tracing::info!("Scheduler disabled");
    }

    // Start web server
    let server = Server::new(cfg, service);
    server.start().await?;

    scheduler.stop().await;

    Ok(())
}
