//! RAG search proxy.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::error::{ApiError, ErrorCode};
use crate::rag::{RagError, search_with_timeout};
use crate::state::AppState;

const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// `POST /api/rag/search`: forward `{query}` to the RAG service.
pub async fn search(State(state): State<AppState>, payload: Result<Json<SearchRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    if request.query.is_empty() {
        return ApiError::BadRequest("Query is required".into()).into_response();
    }

    match search_with_timeout(state.rag.as_ref(), &request.query, None, PROXY_TIMEOUT).await {
        Ok(found) => Json(json!({
            "success": true,
            "contexts": found.contexts,
            "query": found.query.filter(|q| !q.is_empty()).unwrap_or(request.query),
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, code = e.error_code(), retryable = e.retryable(), "rag: search proxy failed");
            let message = match e {
                RagError::Status { .. } => "RAG service error",
                _ => "Failed to connect to RAG service",
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false, "error": message, "contexts": [] })))
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "rag_test.rs"]
mod tests;
