//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves every dashboard API the admin UI calls. Handlers
//! are thin: they validate the body, call into `services` or `ran`, and
//! shape the JSON the UI expects. CORS is wide open and every request is
//! traced.

pub mod chat;
pub mod inference;
pub mod rag;
pub mod ran;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat-vllm", post(chat::chat).get(chat::health))
        .route("/api/ran-agent", post(ran::agent).get(ran::agent_info))
        .route("/api/ran-sites", get(ran::sites))
        .route("/api/ran-health", get(ran::health))
        .route("/api/rag/search", post(rag::search))
        .route("/api/inference", post(inference::generate))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Current UTC time as RFC 3339, for response timestamps.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
