//! Configuration module for windstats.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Alerting thresholds, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Minimum acceptable availability in percent (default: 75.0)
    pub availability: f64,
    /// Maximum acceptable seconds for each failure-time bucket (default: 100.0)
    pub failure_time: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            availability: 75.0,
            failure_time: 100.0,
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Path to the SQLite database file (default: "windstats.db")
    pub db_path: String,
    /// Site identifier that alerts and stat rows are tagged with
    pub site: String,
    /// Base URL of the telemetry API
    pub source_url: String,
    /// Bearer token for the telemetry API
    pub source_api_key: Option<String>,
    /// Per-request timeout for the telemetry API
    pub source_timeout: Duration,
    /// Webhook receiving alerts; alerts are only logged when unset
    pub alert_webhook_url: Option<String>,
    pub thresholds: AlertThresholds,
    /// Whether the periodic jobs run (default: true)
    pub scheduler_enabled: bool,
    pub energy_yield_interval: Duration,
    pub performance_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            db_path: "windstats.db".to_string(),
            site: "GRAIG_FATHA".to_string(),
            source_url: "https://api.vensys.de:8443/api/v1.0/Customer".to_string(),
            source_api_key: None,
            source_timeout: Duration::from_secs(30),
            alert_webhook_url: None,
            thresholds: AlertThresholds::default(),
            scheduler_enabled: true,
            energy_yield_interval: Duration::from_secs(15 * 60),
            performance_interval: Duration::from_secs(6 * 60 * 60),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WINDSTATS_HTTP_PORT`: HTTP port (default: 8080)
    /// - `WINDSTATS_DB_PATH`: Database file path (default: "windstats.db")
    /// - `WINDSTATS_SITE`: Site identifier (default: "GRAIG_FATHA")
    /// - `WINDSTATS_SOURCE_URL`: Telemetry API base URL
    /// - `WINDSTATS_SOURCE_API_KEY`: Telemetry API bearer token
    /// - `WINDSTATS_SOURCE_TIMEOUT_SECS`: Telemetry request timeout (default: 30)
    /// - `WINDSTATS_ALERT_WEBHOOK_URL`: Alert webhook
    /// - `WINDSTATS_AVAILABILITY_THRESHOLD`: Availability threshold in % (default: 75.0)
    /// - `WINDSTATS_FAILURE_TIME_THRESHOLD`: Failure time threshold in seconds (default: 100.0)
    /// - `WINDSTATS_SCHEDULER_ENABLED`: Run periodic jobs (default: true)
    /// - `WINDSTATS_ENERGY_YIELD_INTERVAL_SECS`: Energy yield job period (default: 900)
    /// - `WINDSTATS_PERFORMANCE_INTERVAL_SECS`: Performance job period (default: 21600)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Values that fail to parse keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        set_parsed(&lookup, "WINDSTATS_HTTP_PORT", &mut cfg.http_port);

        if let Some(db_path) = lookup("WINDSTATS_DB_PATH") {
            cfg.db_path = db_path;
        }

        if let Some(site) = lookup("WINDSTATS_SITE").filter(|s| !s.trim().is_empty()) {
            cfg.site = site;
        }

        if let Some(url) = lookup("WINDSTATS_SOURCE_URL") {
            cfg.source_url = url.trim_end_matches('/').to_string();
        }

        cfg.source_api_key = lookup("WINDSTATS_SOURCE_API_KEY").filter(|s| !s.is_empty());
        cfg.alert_webhook_url = lookup("WINDSTATS_ALERT_WEBHOOK_URL").filter(|s| !s.is_empty());

        set_parsed(
            &lookup,
            "WINDSTATS_AVAILABILITY_THRESHOLD",
            &mut cfg.thresholds.availability,
        );
        set_parsed(
            &lookup,
            "WINDSTATS_FAILURE_TIME_THRESHOLD",
            &mut cfg.thresholds.failure_time,
        );
        set_parsed(&lookup, "WINDSTATS_SCHEDULER_ENABLED", &mut cfg.scheduler_enabled);

        set_secs(&lookup, "WINDSTATS_SOURCE_TIMEOUT_SECS", &mut cfg.source_timeout);
        set_secs(
            &lookup,
            "WINDSTATS_ENERGY_YIELD_INTERVAL_SECS",
            &mut cfg.energy_yield_interval,
        );
        set_secs(
            &lookup,
            "WINDSTATS_PERFORMANCE_INTERVAL_SECS",
            &mut cfg.performance_interval,
        );

        cfg
    }
}

fn set_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(value) = lookup(key) {
        if let Ok(parsed) = value.trim().parse() {
            *target = parsed;
        }
    }
}

fn set_secs<F>(lookup: &F, key: &str, target: &mut Duration)
where
    F: Fn(&str) -> Option<String>,
{
    let mut secs = 0u64;
    set_parsed(lookup, key, &mut secs);
    // Zero would make tokio::time::interval panic.
    if secs > 0 {
        *target = Duration::from_secs(secs);
    }
}
