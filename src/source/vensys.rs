//! HTTP client for the Vensys customer telemetry API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{MeanYieldResponse, PerformanceResponse, SourceError, TelemetrySource};

const MEAN_ENERGY_YIELD_PATH: &str = "/MeanData/EnergyYield";
const PERFORMANCE_PATH: &str = "/Performance";
const CURRENT_PERFORMANCE_PATH: &str = "/Performance/Current";

/// Telemetry source backed by the Vensys REST API.
#[derive(Debug, Clone)]
pub struct VensysClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl VensysClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, SourceError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SourceError::Config(format!("unsupported base url: {}", base_url)));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    /// GET a JSON document. An empty body or a literal `null` yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, i64)],
    ) -> Result<Option<T>, SourceError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn map_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else {
            SourceError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl TelemetrySource for VensysClient {
    async fn mean_energy_yield(&self) -> Result<Option<MeanYieldResponse>, SourceError> {
        self.get_json(MEAN_ENERGY_YIELD_PATH, &[]).await
    }

    async fn performance(&self, from: i64, to: i64) -> Result<Option<PerformanceResponse>, SourceError> {
        self.get_json(PERFORMANCE_PATH, &[("from", from), ("to", to)]).await
    }

    async fn current_performance(&self) -> Result<Option<PerformanceResponse>, SourceError> {
        self.get_json(CURRENT_PERFORMANCE_PATH, &[]).await
    }
}
