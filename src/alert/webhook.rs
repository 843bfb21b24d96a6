//! Webhook alert sink.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{AlertError, AlertSink};
use crate::db::Site;

#[derive(Debug, Serialize)]
struct AlertPayload<'a> {
    site: &'a str,
    message: &'a str,
}

/// Sink that POSTs each alert as JSON to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookAlertSink {
    client: Client,
    url: String,
}

impl WebhookAlertSink {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, AlertError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn deliver(&self, site: &Site, message: &str) -> Result<(), AlertError> {
        let payload = AlertPayload {
            site: site.as_str(),
            message,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Status(status.as_u16()));
        }

        Ok(())
    }
}

#[async_trait]
impl AlertSink for WebhookAlertSink {
    async fn send_alert(&self, site: &Site, message: &str) {
        match self.deliver(site, message).await {
            Ok(()) => tracing::info!("Alert delivered for {}", site),
            Err(e) => tracing::error!("Failed to deliver alert for {}: {}", site, e),
        }
    }
}
