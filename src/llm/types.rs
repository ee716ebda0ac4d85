//! LLM types: completion request, seam trait and errors.

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by completion calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// `VLLM_API_URL` is not set.
    #[error("VLLM_API_URL environment variable is not set")]
    NotConfigured,

    /// The HTTP request to vLLM failed before a response arrived.
    #[error("vLLM request failed: {0}")]
    ApiRequest(String),

    /// vLLM returned a non-success HTTP status.
    #[error("vLLM API error: {status}")]
    ApiResponse { status: u16, body: String },

    /// The vLLM response body could not be parsed.
    #[error("vLLM response parse failed: {0}")]
    ApiParse(String),

    /// The call did not finish within the caller's deadline.
    #[error("vLLM request timed out")]
    Timeout,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_VLLM_NOT_CONFIGURED",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::Timeout => "E_TIMEOUT",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::Timeout | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A single-prompt completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Stop sequences; omitted from the wire when empty.
    pub stop: Vec<String>,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self { prompt: prompt.into(), max_tokens, temperature, stop: Vec::new() }
    }

    #[must_use]
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// SEAM
// =============================================================================

/// Text completion backend. Implemented by [`super::vllm::VllmClient`] and by
/// test mocks.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Run one completion and return the generated text (untrimmed).
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Endpoint URL, for health reporting.
    fn endpoint(&self) -> &str;
}
