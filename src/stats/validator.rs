//! Threshold checks on fetched performance windows.

use std::sync::Arc;

use crate::alert::AlertSink;
use crate::config::AlertThresholds;
use crate::db::Site;
use crate::source::{PerformanceQueryResult, PerformanceReading};

type FailureMetric = (&'static str, fn(&PerformanceReading) -> f64);

/// Failure-time buckets in the order they appear in alert text.
const FAILURE_TIME_METRICS: [FailureMetric; 4] = [
    ("Fire time", |r: &PerformanceReading| r.fire_time),
    ("Comm failure time", |r: &PerformanceReading| r.comm_failure_time),
    ("Grid failure time", |r: &PerformanceReading| r.grid_failure_time),
    ("Error time", |r: &PerformanceReading| r.error_time),
];

/// Raises at most one alert per performance window.
pub struct PerformanceValidator {
    site: Site,
    thresholds: AlertThresholds,
    alerts: Arc<dyn AlertSink>,
}

impl PerformanceValidator {
    pub fn new(site: Site, thresholds: AlertThresholds, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            site,
            thresholds,
            alerts,
        }
    }

    /// Send an alert for `result` if it is absent or breaches a threshold.
    pub async fn validate(&self, result: &PerformanceQueryResult) {
        if let Some(message) = self.alert_message(result) {
            self.alerts.send_alert(&self.site, &message).await;
        }
    }

    /// Build the alert text for `result`, or `None` when nothing is wrong.
    pub fn alert_message(&self, result: &PerformanceQueryResult) -> Option<String> {
        let lines = match result.reading() {
            Err(absence) => vec![absence.to_string()],
            Ok(reading) => self.violations(reading),
        };

        if lines.is_empty() {
            return None;
        }

        let mut message = format!("({}): ", result.window_label());
        for line in lines {
            message.push_str(&line);
            message.push('\n');
        }
        Some(message)
    }

    fn violations(&self, reading: &PerformanceReading) -> Vec<String> {
        let mut lines = Vec::new();

        // Availability is inclusive, failure times are exclusive.
        if reading.availability <= self.thresholds.availability {
            lines.push(format!(
                "Availability ({:?}%) less than threshold ({:?}%).",
                reading.availability, self.thresholds.availability
            ));
        }

        for (label, value_of) in FAILURE_TIME_METRICS {
            let value = value_of(reading);
            if value > self.thresholds.failure_time {
                lines.push(format!(
                    "{} ({:?}s) exceeds threshold ({:?}s).",
                    label, value, self.thresholds.failure_time
                ));
            }
        }

        lines
    }
}
