//! Operator alert delivery.

mod webhook;

pub use webhook::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::Site;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("alert endpoint returned status {0}")]
    Status(u16),
}

/// Destination for operator alerts.
///
/// Delivery is fire-and-forget: sinks deal with their own failures.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, site: &Site, message: &str);
}

/// Sink that only writes alerts to the log.
#[derive(Debug, Default, Clone)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send_alert(&self, site: &Site, message: &str) {
        tracing::warn!(site = %site, "ALERT: {}", message.trim_end());
    }
}
