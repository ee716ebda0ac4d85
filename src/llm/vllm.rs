//! vLLM completions client.
//!
//! Speaks the OpenAI-style `/v1/completions` protocol that vLLM serves:
//! one prompt in, `choices[0].text` out.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::types::{Completion, CompletionRequest, LlmError};
use crate::config::{HttpTimeouts, VllmConfig};

pub struct VllmClient {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl VllmClient {
    /// Build a client for the given completions URL.
    ///
    /// `accept_invalid_certs` disables TLS certificate validation, for
    /// clusters that front vLLM with self-signed routes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &VllmConfig, timeouts: HttpTimeouts, accept_invalid_certs: bool) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url.clone(), model: config.model.clone() })
    }

    async fn send_json(&self, body: &impl Serialize) -> Result<String, LlmError> {
        let response = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %text, "vllm: error response");
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Completion for VllmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = CompletionBody {
            model: &self.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
            stop: &request.stop,
        };
        let text = self.send_json(&body).await?;
        parse_completion_text(&text)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

/// Extract `choices[0].text`. A response without choices yields empty text.
pub(crate) fn parse_completion_text(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    Ok(root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
#[path = "vllm_test.rs"]
mod tests;
