//! Telemetry source module.
//!
//! Defines the remote telemetry interface and its HTTP implementation.

mod models;
mod vensys;

pub use models::*;
pub use vensys::*;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Telemetry source error types.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("telemetry request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("telemetry source returned status {0}")]
    Status(u16),
    #[error("invalid telemetry payload: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Remote service providing turbine telemetry.
///
/// `Ok(None)` is a null response, which is not an error.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn mean_energy_yield(&self) -> Result<Option<MeanYieldResponse>, SourceError>;

    /// Performance for the window between two epoch-second timestamps.
    async fn performance(&self, from: i64, to: i64) -> Result<Option<PerformanceResponse>, SourceError>;

    async fn current_performance(&self) -> Result<Option<PerformanceResponse>, SourceError>;
}
