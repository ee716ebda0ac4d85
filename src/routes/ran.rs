//! RAN agent and RAN backend read routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use super::now_rfc3339;
use crate::error::{ApiError, ErrorCode};
use crate::ran::{agent, sites};
use crate::state::AppState;
use crate::types::{AgentReply, AgentRequest};

/// `POST /api/ran-agent`: route a question through the RAN agent.
pub async fn agent(
    State(state): State<AppState>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentReply>, ApiError> {
    let Json(request) = payload?;
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".into()));
    }
    Ok(Json(agent::answer(state.ran.as_ref(), &request.message, state.ran_agent_live).await))
}

/// `GET /api/ran-agent`
pub async fn agent_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ran-agent-api",
        "ran_services_url": state.ran.base_url(),
    }))
}

/// `GET /api/ran-sites`: live sites with per-site metrics.
pub async fn sites(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let sites = sites::live_sites_with_metrics(state.ran.as_ref()).await.map_err(|e| {
        error!(error = %e, code = e.error_code(), retryable = e.retryable(), "ran: live sites unavailable");
        ApiError::Upstream(e.to_string())
    })?;
    info!(sites = sites.len(), "ran: live sites");
    Ok(Json(json!({ "success": true, "sites": sites, "timestamp": now_rfc3339() })))
}

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    endpoint: Option<String>,
}

/// `GET /api/ran-health?endpoint=/path`: pass-through read of any backend path.
pub async fn health(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> Response {
    let Some(endpoint) = query.endpoint.filter(|e| !e.is_empty()) else {
        return ApiError::BadRequest("Endpoint parameter required".into()).into_response();
    };
    match state.ran.get_raw(&endpoint).await {
        Ok(reply) => Json(json!({
            "success": reply.ok(),
            "status": reply.status,
            "data": reply.body,
            "endpoint": endpoint,
            "timestamp": now_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, %endpoint, "ran: health read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string(), "endpoint": endpoint })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "ran_test.rs"]
mod tests;
