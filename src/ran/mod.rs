//! RAN: client for the RAN backend service and the agent built on it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The RAN backend (alarms, KPIs, cell details, remediation playbooks and a
//! proxy to the live simulator) is a separate service. Everything here reads
//! it as opaque JSON: the agent picks fields out of payloads it does not own,
//! falling back to demo constants when a field is missing.

pub mod agent;
pub mod demo;
pub mod sites;

use std::time::Duration;

use serde_json::Value;

use crate::config::HttpTimeouts;
use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RanError {
    #[error("RAN services request failed: {0}")]
    Request(String),

    #[error("RAN Services returned {status}")]
    Status { status: u16 },

    #[error("RAN services response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for RanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_RAN_REQUEST",
            Self::Status { .. } => "E_RAN_STATUS",
            Self::Parse(_) => "E_RAN_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 500..=599 })
    }
}

/// Upstream reply passed through without interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub status: u16,
    pub body: Value,
}

impl RawReply {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// SEAM
// =============================================================================

#[async_trait::async_trait]
pub trait RanBackend: Send + Sync {
    /// `GET /api/ran/live-sites`
    async fn live_sites(&self) -> Result<Value, RanError>;

    /// `GET /api/ran/live-sites/<site_id>`. The body is returned whatever the
    /// status, so an unknown site yields its `{error}` payload.
    async fn live_site(&self, site_id: &str) -> Result<Value, RanError>;

    /// `GET /api/ran/combined-site-analysis/<site_id>`
    async fn combined_site_analysis(&self, site_id: &str) -> Result<Value, RanError>;

    /// `GET /api/ran/alarms[?severity=..]`
    async fn alarms(&self, severity: Option<&str>) -> Result<Value, RanError>;

    /// `GET <endpoint>` relative to the base URL, any status.
    async fn get_raw(&self, endpoint: &str) -> Result<RawReply, RanError>;

    /// Base URL, for health reporting.
    fn base_url(&self) -> &str;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct RanHttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl RanHttpClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, RanError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| RanError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    async fn get_json(&self, path: &str) -> Result<Value, RanError> {
        let reply = self.get_raw(path).await?;
        if !reply.ok() {
            return Err(RanError::Status { status: reply.status });
        }
        Ok(reply.body)
    }
}

#[async_trait::async_trait]
impl RanBackend for RanHttpClient {
    async fn live_sites(&self) -> Result<Value, RanError> {
        self.get_json("/api/ran/live-sites").await
    }

    async fn live_site(&self, site_id: &str) -> Result<Value, RanError> {
        let reply = self.get_raw(&format!("/api/ran/live-sites/{site_id}")).await?;
        Ok(reply.body)
    }

    async fn combined_site_analysis(&self, site_id: &str) -> Result<Value, RanError> {
        self.get_json(&format!("/api/ran/combined-site-analysis/{site_id}")).await
    }

    async fn alarms(&self, severity: Option<&str>) -> Result<Value, RanError> {
        match severity {
            Some(severity) => self.get_json(&format!("/api/ran/alarms?severity={severity}")).await,
            None => self.get_json("/api/ran/alarms").await,
        }
    }

    async fn get_raw(&self, endpoint: &str) -> Result<RawReply, RanError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, "ran: get");
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| RanError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| RanError::Request(e.to_string()))?;
        let body = serde_json::from_str(&text).map_err(|e| RanError::Parse(e.to_string()))?;
        Ok(RawReply { status, body })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
