//! Inference gateway: prompt enrichment and backend fallback chain.
//!
//! DESIGN
//! ======
//! `POST /api/inference` always answers. The chain is:
//!
//! 1. gRPC RAG context, prepended to the prompt (skipped on failure)
//! 2. vLLM when configured, else the gRPC inference service
//! 3. canned demo text picked by keyword
//!
//! A configured vLLM that fails does not fall through to gRPC; it goes
//! straight to demo text.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::ErrorCode;
use crate::llm::{Completion, CompletionRequest, LlmError};
use crate::prompt::{enhance_with_context, estimate_tokens};
use crate::rag::RagContext;
use crate::types::{GenerationRequest, GenerationResponse, Usage};

/// Model name sent to the gRPC inference service.
pub const GRPC_MODEL: &str = "gemma-2b-it";

const DEMO_COMPLETION_TOKENS: u64 = 250;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid gRPC endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("gRPC call failed: {0}")]
    Rpc(String),

    /// Backend answered with `success: false`.
    #[error("{0}")]
    Backend(String),

    #[error("context payload parse failed: {0}")]
    ContextParse(String),

    #[error("Inference service error: {0}")]
    Llm(#[from] LlmError),
}

impl ErrorCode for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Endpoint { .. } => "E_GRPC_ENDPOINT",
            Self::Rpc(_) => "E_GRPC_CALL",
            Self::Backend(_) => "E_BACKEND",
            Self::ContextParse(_) => "E_CONTEXT_PARSE",
            Self::Llm(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Rpc(_) => true,
            Self::Llm(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// SEAMS
// =============================================================================

/// Context lookup for prompt enrichment.
#[async_trait::async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn context_for(&self, query: &str) -> Result<Vec<RagContext>, GatewayError>;
}

/// Text generation fallback used when vLLM is not configured.
#[async_trait::async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(&self, model: &str, request: &CompletionRequest) -> Result<String, GatewayError>;
}

// =============================================================================
// GATEWAY
// =============================================================================

pub struct InferenceGateway {
    vllm: Option<Arc<dyn Completion>>,
    retriever: Arc<dyn ContextRetriever>,
    backend: Arc<dyn InferenceBackend>,
}

impl InferenceGateway {
    #[must_use]
    pub fn new(
        vllm: Option<Arc<dyn Completion>>,
        retriever: Arc<dyn ContextRetriever>,
        backend: Arc<dyn InferenceBackend>,
    ) -> Self {
        Self { vllm, retriever, backend }
    }

    /// Generate text for a prompt. Backend failures degrade to demo text.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResponse {
        let enhanced = self.enhance(&request.prompt).await;
        debug!(
            enhanced = enhanced != request.prompt,
            prompt_len = enhanced.len(),
            "inference: generating"
        );
        match self.infer(request, &enhanced).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "inference: backends unavailable; using demo response");
                GenerationResponse {
                    text: demo_text(&request.prompt).to_string(),
                    usage: Usage {
                        prompt_tokens: estimate_tokens(&request.prompt),
                        completion_tokens: DEMO_COMPLETION_TOKENS,
                    },
                }
            }
        }
    }

    async fn enhance(&self, prompt: &str) -> String {
        match self.retriever.context_for(prompt).await {
            Ok(contexts) if !contexts.is_empty() => {
                let texts: Vec<&str> = contexts.iter().map(|ctx| ctx.text.as_str()).collect();
                debug!(contexts = texts.len(), "inference: enhanced prompt with RAG context");
                enhance_with_context(prompt, &texts)
            }
            Ok(_) => prompt.to_string(),
            Err(e) => {
                warn!(error = %e, "inference: RAG enhancement failed; proceeding with original prompt");
                prompt.to_string()
            }
        }
    }

    async fn infer(&self, request: &GenerationRequest, enhanced: &str) -> Result<GenerationResponse, GatewayError> {
        let call = CompletionRequest::new(enhanced, request.max_tokens, request.temperature);

        if let Some(vllm) = &self.vllm {
            let text = vllm.complete(&call).await.inspect_err(|e| {
                error!(error = %e, endpoint = vllm.endpoint(), "inference: vLLM call failed");
            })?;
            info!(text_len = text.len(), "inference: vLLM answered");
            return Ok(GenerationResponse {
                usage: Usage { prompt_tokens: estimate_tokens(enhanced), completion_tokens: estimate_tokens(&text) },
                text,
            });
        }

        let text = self.backend.generate(GRPC_MODEL, &call).await.inspect_err(|e| {
            error!(error = %e, "inference: gRPC inference failed");
        })?;
        info!(text_len = text.len(), "inference: gRPC backend answered");
        Ok(GenerationResponse {
            usage: Usage {
                prompt_tokens: estimate_tokens(&request.prompt),
                completion_tokens: estimate_tokens(&text),
            },
            text,
        })
    }
}

// =============================================================================
// DEMO TEXT
// =============================================================================

const DEMO_PROTOCOL_DEVIATION: &str = "According to our ticket database, there are 14 previous tickets related to Protocol Deviation issues. These were typically categorized as medium severity and resolved within 24-48 hours. For Protocol Deviation in network services, the most common resolution was reconfiguring firewall rules and updating protocol handlers. For Protocol Deviation in JIRA integrations specifically, these tickets were typically resolved within 1-2 hours. The most common solution was refreshing API tokens and updating webhook endpoints to match the current environment configuration.";

const DEMO_TICKETS: &str = "Based on our ticket database, I can help with your JIRA management question. Best practices for ticket organization include using consistent labeling, proper priority assignment, and regular status updates. Consider implementing automation rules for routine tasks and use epics to group related tickets together. Many teams have found success with the Kanban method for visualizing workflow and managing ticket progress efficiently. Our historical data shows that JIRA integration issues, particularly with webhooks and API connections, are typically resolved within 1-2 hours by refreshing authentication tokens and verifying endpoint configurations.";

const DEMO_ERRORS: &str = "I've analyzed similar error patterns in our ticket database. This appears to be a common integration issue that typically takes about 1.5 hours to resolve. The recommended approach is to check configuration settings, verify endpoint connectivity, and review recent system changes. Our knowledge base shows that 72% of similar cases were resolved by updating authentication tokens or refreshing API credentials. For persistent issues, escalating to the integration team with specific error logs has shown to reduce resolution time by 40%.";

const DEMO_DEFAULT: &str = "Based on our ticket database and knowledge base, I can provide you with insights on this query. Similar questions have been addressed in our system before. The most effective approach would be to first categorize this request appropriately, assign it to the team with relevant expertise, and provide all necessary context. Our historical data shows that clear documentation and reproducible examples significantly improve resolution times. When creating new tickets, our AI assistant can help identify similar past issues to speed up resolution.";

/// Canned answer for when no backend is reachable, picked by keyword.
#[must_use]
pub fn demo_text(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));
    if mentions(&["protocol deviation"]) {
        DEMO_PROTOCOL_DEVIATION
    } else if mentions(&["jira", "ticket"]) {
        DEMO_TICKETS
    } else if mentions(&["error", "issue", "problem"]) {
        DEMO_ERRORS
    } else {
        DEMO_DEFAULT
    }
}

#[cfg(test)]
#[path = "inference_test.rs"]
mod tests;
