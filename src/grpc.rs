//! gRPC adapters for the inference gateway's backends.
//!
//! Channels connect lazily: building a client never touches the network, so
//! the gateway starts even when neither backend is up.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use crate::config::HttpTimeouts;
use crate::llm::CompletionRequest;
use crate::proto::inference::client::inference_service_client::InferenceServiceClient;
use crate::proto::inference::client::rag_service_client::RagServiceClient;
use crate::proto::inference::{ContextRequest, InferenceRequest};
use crate::rag::RagContext;
use crate::services::inference::{ContextRetriever, GatewayError, InferenceBackend};

fn lazy_channel(url: &str, timeouts: HttpTimeouts) -> Result<Channel, GatewayError> {
    let endpoint = Endpoint::from_shared(url.to_string())
        .map_err(|e| GatewayError::Endpoint { url: url.to_string(), reason: e.to_string() })?
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs));
    Ok(endpoint.connect_lazy())
}

// =============================================================================
// RAG SERVICE
// =============================================================================

pub struct GrpcContextRetriever {
    client: RagServiceClient<Channel>,
}

impl GrpcContextRetriever {
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid endpoint URI.
    pub fn connect_lazy(url: &str, timeouts: HttpTimeouts) -> Result<Self, GatewayError> {
        Ok(Self { client: RagServiceClient::new(lazy_channel(url, timeouts)?) })
    }
}

#[async_trait::async_trait]
impl ContextRetriever for GrpcContextRetriever {
    async fn context_for(&self, query: &str) -> Result<Vec<RagContext>, GatewayError> {
        // Tonic clients are cheap handles over the shared channel.
        let mut client = self.client.clone();
        let reply = client
            .get_context(ContextRequest { query: query.to_string() })
            .await
            .map_err(|status| GatewayError::Rpc(status.message().to_string()))?
            .into_inner();
        if !reply.success {
            return Err(GatewayError::Backend(reply.error));
        }
        parse_contexts(&reply.contexts)
    }
}

/// Decode the JSON-encoded context list carried in `ContextResponse.contexts`.
pub(crate) fn parse_contexts(raw: &str) -> Result<Vec<RagContext>, GatewayError> {
    serde_json::from_str(raw).map_err(|e| GatewayError::ContextParse(e.to_string()))
}

// =============================================================================
// INFERENCE SERVICE
// =============================================================================

pub struct GrpcInference {
    client: InferenceServiceClient<Channel>,
}

impl GrpcInference {
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid endpoint URI.
    pub fn connect_lazy(url: &str, timeouts: HttpTimeouts) -> Result<Self, GatewayError> {
        Ok(Self { client: InferenceServiceClient::new(lazy_channel(url, timeouts)?) })
    }
}

#[async_trait::async_trait]
impl InferenceBackend for GrpcInference {
    async fn generate(&self, model: &str, request: &CompletionRequest) -> Result<String, GatewayError> {
        let mut client = self.client.clone();
        let reply = client
            .generate_response(InferenceRequest {
                model: model.to_string(),
                prompt: request.prompt.clone(),
                max_tokens: i32::try_from(request.max_tokens).unwrap_or(i32::MAX),
                temperature: request.temperature,
            })
            .await
            .map_err(|status| GatewayError::Rpc(status.message().to_string()))?
            .into_inner();
        if !reply.success {
            let message = if reply.error.is_empty() { "Unknown inference error".to_string() } else { reply.error };
            return Err(GatewayError::Backend(message));
        }
        Ok(reply.text)
    }
}

#[cfg(test)]
#[path = "grpc_test.rs"]
mod tests;
