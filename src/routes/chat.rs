//! Ticket-assistant chat routes.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::error::{ApiError, ErrorCode};
use crate::services::chat::{self, ChatError, HealthReport};
use crate::state::AppState;
use crate::types::{ChatReply, ChatRequest};

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => Self::BadRequest(err.to_string()),
            ChatError::Llm(e) => {
                error!(error = %e, code = e.error_code(), retryable = e.retryable(), "chat: completion failed");
                Self::Upstream(e.to_string())
            }
        }
    }
}

/// `POST /api/chat-vllm`: answer one question with RAG context.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload?;
    let reply = chat::answer(state.llm.as_deref(), state.rag.as_ref(), &request).await?;
    Ok(Json(reply))
}

/// `GET /api/chat-vllm`: probe vLLM and RAG.
pub async fn health(State(state): State<AppState>) -> Response {
    match chat::health(state.llm.as_deref(), state.rag.as_ref()).await {
        HealthReport::NotConfigured => unavailable("VLLM_API_URL not configured"),
        HealthReport::Failed(message) => unavailable(&message),
        HealthReport::Checked { vllm_healthy, rag_healthy, vllm_url } => Json(json!({
            "status": "ok",
            "services": { "vllm": label(vllm_healthy), "rag": label(rag_healthy) },
            "vllmUrl": vllm_url,
        }))
        .into_response(),
    }
}

fn unavailable(message: &str) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "error", "message": message }))).into_response()
}

fn label(healthy: bool) -> &'static str {
    if healthy { "healthy" } else { "unhealthy" }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
