//! Chat service: RAG-augmented ticket assistant over vLLM.
//!
//! DESIGN
//! ======
//! One question, one completion. RAG is best-effort: any failure is logged
//! and the prompt is built without retrieved context. vLLM is required;
//! without it the call fails with the configuration error text.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::llm::{Completion, CompletionRequest, LlmError};
use crate::prompt::{STOP_SEQUENCES, build_chat_prompt, format_rag_context};
use crate::rag::{RagError, RagSearch, search_with_timeout};
use crate::types::{ChatReply, ChatRequest, Usage};

pub const RAG_TOP_K: usize = 3;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const PROBE_PROMPT: &str = "Hi";
const PROBE_QUERY: &str = "test";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Answer one chat question.
///
/// # Errors
///
/// Returns [`ChatError::EmptyMessage`] for a blank message, or the vLLM error
/// when vLLM is unconfigured or the completion fails.
pub async fn answer(
    llm: Option<&dyn Completion>,
    rag: &dyn RagSearch,
    request: &ChatRequest,
) -> Result<ChatReply, ChatError> {
    if request.message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    let context = request.effective_context();
    info!(
        message_len = request.message.len(),
        max_tokens = request.max_tokens,
        has_page_context = context.is_some(),
        "chat: request"
    );

    let rag_context = match rag.search(&request.message, Some(RAG_TOP_K)).await {
        Ok(response) => format_rag_context(response.usable_contexts()),
        Err(e) => {
            warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "chat: RAG search failed; continuing without context");
            String::new()
        }
    };
    info!(rag_context_len = rag_context.len(), "chat: RAG context");

    let prompt = build_chat_prompt(&request.message, &rag_context, context.as_ref());
    let llm = llm.ok_or(LlmError::NotConfigured)?;
    let call = CompletionRequest::new(prompt.as_str(), request.max_tokens, request.temperature)
        .with_stop(STOP_SEQUENCES);
    let generated = llm.complete(&call).await?;
    info!(text_len = generated.len(), "chat: vLLM response");

    Ok(ChatReply {
        success: true,
        text: generated.trim().to_string(),
        has_context: !rag_context.is_empty(),
        usage: Usage { prompt_tokens: char_len(&prompt), completion_tokens: char_len(&generated) },
    })
}

fn char_len(text: &str) -> u64 {
    text.chars().count() as u64
}

// =============================================================================
// HEALTH
// =============================================================================

/// Outcome of the chat dependency probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthReport {
    NotConfigured,
    /// The vLLM probe could not complete at all.
    Failed(String),
    Checked { vllm_healthy: bool, rag_healthy: bool, vllm_url: String },
}

/// Probe vLLM with a one-token completion and RAG with a one-result search.
pub async fn health(llm: Option<&dyn Completion>, rag: &dyn RagSearch) -> HealthReport {
    let Some(llm) = llm else {
        return HealthReport::NotConfigured;
    };

    let probe = CompletionRequest::new(PROBE_PROMPT, 1, 0.0);
    let vllm_healthy = match tokio::time::timeout(PROBE_TIMEOUT, llm.complete(&probe)).await {
        Ok(Ok(_) | Err(LlmError::ApiParse(_))) => true,
        Ok(Err(LlmError::ApiResponse { status, .. })) => {
            warn!(status, "chat: vLLM probe returned error status");
            false
        }
        Ok(Err(e)) => return HealthReport::Failed(e.to_string()),
        Err(_) => return HealthReport::Failed(LlmError::Timeout.to_string()),
    };

    let rag_healthy = match search_with_timeout(rag, PROBE_QUERY, Some(1), PROBE_TIMEOUT).await {
        Ok(_) | Err(RagError::Parse(_)) => true,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "chat: RAG probe failed");
            false
        }
    };

    HealthReport::Checked { vllm_healthy, rag_healthy, vllm_url: public_vllm_url(llm.endpoint()) }
}

/// Completions URL with the `/v1/completions` suffix hidden.
#[must_use]
pub fn public_vllm_url(url: &str) -> String {
    url.strip_suffix("/v1/completions").unwrap_or(url).to_string()
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
