//! LLM: completion backends used by chat and the inference gateway.
//!
//! DESIGN
//! ======
//! Routes depend on the [`Completion`] trait only. The one concrete backend
//! is vLLM over HTTP(S); `from_config` returns `None` when `VLLM_API_URL` is
//! unset so callers can report "not configured" instead of failing startup.

pub mod types;
pub mod vllm;

use std::sync::Arc;

use crate::config::{AppConfig, VllmConfig};
pub use types::{Completion, CompletionRequest, LlmError};

/// Build a vLLM client when one is configured.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to build.
pub fn from_config(config: &AppConfig, insecure_tls: bool) -> Result<Option<Arc<dyn Completion>>, LlmError> {
    config
        .vllm
        .as_ref()
        .map(|vllm: &VllmConfig| {
            vllm::VllmClient::new(vllm, config.timeouts, insecure_tls).map(|c| Arc::new(c) as Arc<dyn Completion>)
        })
        .transpose()
}
