//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds one client per upstream behind its trait seam, plus the inference
//! gateway that chains several of them. Nothing in it is mutable; cloning is
//! a handful of `Arc` bumps.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::grpc::{GrpcContextRetriever, GrpcInference};
use crate::llm::{self, Completion, LlmError};
use crate::rag::{RagError, RagHttpClient, RagSearch};
use crate::ran::{RanBackend, RanError, RanHttpClient};
use crate::services::inference::{GatewayError, InferenceGateway};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Rag(#[from] RagError),
    #[error(transparent)]
    Ran(#[from] RanError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone)]
pub struct AppState {
    /// vLLM for the chat assistant. `None` when `VLLM_API_URL` is unset.
    pub llm: Option<Arc<dyn Completion>>,
    pub rag: Arc<dyn RagSearch>,
    pub ran: Arc<dyn RanBackend>,
    pub gateway: Arc<InferenceGateway>,
    /// Live RAN lookups in the agent router; demo replies only when false.
    pub ran_agent_live: bool,
}

impl AppState {
    /// Build every upstream client from config. No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build or a gRPC URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let llm = llm::from_config(config, false)?;
        let gateway_llm = llm::from_config(config, config.gateway_vllm_insecure_tls)?;
        let retriever = GrpcContextRetriever::connect_lazy(&config.rag_service_url, config.timeouts)?;
        let backend = GrpcInference::connect_lazy(&config.ipex_service_url, config.timeouts)?;

        Ok(Self {
            llm,
            rag: Arc::new(RagHttpClient::new(&config.rag_search_url, config.timeouts)?),
            ran: Arc::new(RanHttpClient::new(&config.ran_services_url, config.timeouts)?),
            gateway: Arc::new(InferenceGateway::new(gateway_llm, Arc::new(retriever), Arc::new(backend))),
            ran_agent_live: config.ran_agent_live,
        })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
