//! HTTP ingestion client.
//!
//! One blocking POST per run with bounded connect and total timeouts.

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use super::MetricSink;
use crate::config::SinkSettings;
use crate::error::{MonitorError, Result};

/// Authorization scheme expected by the ingestion endpoint
pub const API_TOKEN_SCHEME: &str = "Api-Token";

const ACCEPT_VALUE: &str = "application/json; charset=utf-8";
const CONTENT_TYPE_VALUE: &str = "text/plain; charset=utf-8";

pub struct HttpMetricSink {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl HttpMetricSink {
    pub fn new(settings: &SinkSettings) -> Result<Self> {
        if settings.insecure_tls {
            tracing::warn!("TLS certificate verification disabled for metric endpoint");
        }
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.insecure_tls)
            .user_agent(concat!("hostwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MonitorError::SinkSetup(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_token: settings.api_token.clone(),
        })
    }
}

/// Map a non-success status to a transport error carrying the body
fn validate_response_status(response: Response) -> Result<String> {
    let status = response.status();
    let body = match response.text() {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "Failed to read response body");
            String::new()
        }
    };
    if !status.is_success() {
        return Err(MonitorError::Transport(format!(
            "HTTP {} - {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error"),
            body.trim()
        )));
    }
    Ok(body)
}

impl MetricSink for HttpMetricSink {
    fn send(&self, payload: &str) -> Result<()> {
        tracing::info!(
            endpoint = %self.endpoint,
            lines = payload.lines().count(),
            "Sending metric payload"
        );
        tracing::debug!(payload, "Metric payload");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, ACCEPT_VALUE)
            .header(AUTHORIZATION, format!("{API_TOKEN_SCHEME} {}", self.api_token))
            .header(CONTENT_TYPE, CONTENT_TYPE_VALUE)
            .body(payload.to_string())
            .send()
            .map_err(|e| MonitorError::Transport(e.to_string()))?;

        let body = validate_response_status(response)?;
        tracing::info!(response = %body.trim(), "Metric endpoint response");
        Ok(())
    }
}
