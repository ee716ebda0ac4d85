//! Service configuration parsed from environment variables.
//!
//! Parsing goes through a lookup closure so tests can feed a fixed map
//! instead of mutating the process environment.

use crate::error::ErrorCode;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_VLLM_MODEL: &str = "vllm";
pub const DEFAULT_RAG_SEARCH_URL: &str = "http://rag-service:50052";
pub const DEFAULT_RAN_SERVICES_URL: &str = "http://ran-services:5000";
pub const DEFAULT_IPEX_SERVICE_URL: &str = "http://localhost:50051";
pub const DEFAULT_RAG_SERVICE_URL: &str = "http://localhost:50052";
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        "E_CONFIG_PARSE"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_HTTP_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS }
    }
}

/// vLLM completion endpoint. Absent when `VLLM_API_URL` is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VllmConfig {
    /// Full completions URL, e.g. `https://host/v1/completions`.
    pub url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub vllm: Option<VllmConfig>,
    pub rag_search_url: String,
    pub ran_services_url: String,
    pub ran_agent_live: bool,
    pub ipex_service_url: String,
    pub rag_service_url: String,
    pub gateway_vllm_insecure_tls: bool,
    pub timeouts: HttpTimeouts,
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `VLLM_API_URL`: vLLM completions URL; chat and gateway vLLM calls are disabled when unset
    /// - `VLLM_MODEL`: default `vllm`
    /// - `RAG_SEARCH_URL`: HTTP RAG service base URL
    /// - `RAN_SERVICES_URL`: RAN backend base URL
    /// - `RAN_AGENT_LIVE`: default `true`
    /// - `IPEX_SERVICE_URL` / `RAG_SERVICE_URL`: gRPC backends for the inference gateway
    /// - `GATEWAY_VLLM_INSECURE_TLS`: default `true`
    /// - `HTTP_REQUEST_TIMEOUT_SECS` / `HTTP_CONNECT_TIMEOUT_SECS`: default 120 / 10
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let vllm = var("VLLM_API_URL").map(|url| VllmConfig {
            url,
            model: var("VLLM_MODEL").unwrap_or_else(|| DEFAULT_VLLM_MODEL.to_string()),
        });

        Ok(Self {
            port: parse_number("PORT", var("PORT"), DEFAULT_PORT)?,
            vllm,
            rag_search_url: base_url(var("RAG_SEARCH_URL"), DEFAULT_RAG_SEARCH_URL),
            ran_services_url: base_url(var("RAN_SERVICES_URL"), DEFAULT_RAN_SERVICES_URL),
            ran_agent_live: parse_bool("RAN_AGENT_LIVE", var("RAN_AGENT_LIVE"), true)?,
            ipex_service_url: base_url(var("IPEX_SERVICE_URL"), DEFAULT_IPEX_SERVICE_URL),
            rag_service_url: base_url(var("RAG_SERVICE_URL"), DEFAULT_RAG_SERVICE_URL),
            gateway_vllm_insecure_tls: parse_bool(
                "GATEWAY_VLLM_INSECURE_TLS",
                var("GATEWAY_VLLM_INSECURE_TLS"),
                true,
            )?,
            timeouts: HttpTimeouts {
                request_secs: parse_number(
                    "HTTP_REQUEST_TIMEOUT_SECS",
                    var("HTTP_REQUEST_TIMEOUT_SECS"),
                    DEFAULT_HTTP_REQUEST_TIMEOUT_SECS,
                )?,
                connect_secs: parse_number(
                    "HTTP_CONNECT_TIMEOUT_SECS",
                    var("HTTP_CONNECT_TIMEOUT_SECS"),
                    DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
                )?,
            },
        })
    }
}

/// gRPC endpoints need a scheme; bare `host:port` values get `http://`.
fn base_url(raw: Option<String>, default: &str) -> String {
    let url = raw.unwrap_or_else(|| default.to_string());
    let url = if url.contains("://") { url } else { format!("http://{url}") };
    url.trim_end_matches('/').to_string()
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::InvalidValue { var, value: raw.unwrap_or_default() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
