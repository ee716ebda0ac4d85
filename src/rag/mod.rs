//! RAG: retrieval of ticket and knowledge-base snippets.
//!
//! DESIGN
//! ======
//! The HTTP RAG service embeds the query and returns the top-k matches as
//! `{success, contexts: [{text, score, metadata: {type, original}}], query}`.
//! Chat treats any failure here as "no context" and keeps going. The search
//! proxy passes failures through to the caller.

mod http;

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorCode;
pub use http::RagHttpClient;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("RAG request failed: {0}")]
    Request(String),

    #[error("RAG service returned status {status}")]
    Status { status: u16 },

    #[error("RAG response parse failed: {0}")]
    Parse(String),

    #[error("RAG request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for RagError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_RAG_REQUEST",
            Self::Status { .. } => "E_RAG_STATUS",
            Self::Parse(_) => "E_RAG_PARSE",
            Self::Timeout(_) => "E_TIMEOUT",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Timeout(_) | Self::Status { status: 500..=599 })
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// What kind of record a context was embedded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    Ticket,
    Comment,
    KnowledgeArticle,
    TicketTemplate,
    Other(String),
}

impl ContextKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ticket" => Self::Ticket,
            "comment" => Self::Comment,
            "knowledge_article" => Self::KnowledgeArticle,
            "ticket_template" => Self::TicketTemplate,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContextMetadata {
    /// Record type; a missing, null or empty `type` reads as `unknown`.
    #[serde(rename = "type", default = "unknown_kind", deserialize_with = "kind_or_unknown")]
    pub kind: String,
    #[serde(default)]
    pub original: Value,
    /// Extra keys (e.g. `ticket_key` on comments) pass through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ContextMetadata {
    fn default() -> Self {
        Self { kind: unknown_kind(), original: Value::Null, extra: Map::new() }
    }
}

fn unknown_kind() -> String {
    "unknown".to_string()
}

fn kind_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|kind| !kind.is_empty()).unwrap_or_else(unknown_kind))
}

impl ContextMetadata {
    /// Header label for the prompt; never empty.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.kind.is_empty() { "unknown" } else { &self.kind }
    }

    #[must_use]
    pub fn kind(&self) -> ContextKind {
        ContextKind::parse(&self.kind)
    }
}

/// One retrieved snippet.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RagContext {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: ContextMetadata,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub contexts: Vec<RagContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Contexts usable for prompt enrichment: empty unless the service
    /// reported success.
    #[must_use]
    pub fn usable_contexts(&self) -> &[RagContext] {
        if self.success { &self.contexts } else { &[] }
    }
}

// =============================================================================
// SEAM
// =============================================================================

#[async_trait::async_trait]
pub trait RagSearch: Send + Sync {
    /// Search for contexts. `top_k` is omitted from the request when `None`
    /// so the service default applies.
    async fn search(&self, query: &str, top_k: Option<usize>) -> Result<SearchResponse, RagError>;
}

/// Run a search under a deadline.
///
/// # Errors
///
/// Returns the search error, or [`RagError::Timeout`] if the deadline passes.
pub async fn search_with_timeout(
    rag: &dyn RagSearch,
    query: &str,
    top_k: Option<usize>,
    deadline: Duration,
) -> Result<SearchResponse, RagError> {
    tokio::time::timeout(deadline, rag.search(query, top_k))
        .await
        .map_err(|_| RagError::Timeout(deadline))?
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
