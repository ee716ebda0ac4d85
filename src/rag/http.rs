//! HTTP client for the RAG search service (`POST <base>/search`).

use std::time::Duration;

use serde::Serialize;

use super::{RagError, RagSearch, SearchResponse};
use crate::config::HttpTimeouts;

pub struct RagHttpClient {
    http: reqwest::Client,
    search_url: String,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<usize>,
}

impl RagHttpClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, RagError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| RagError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, search_url: format!("{}/search", base_url.trim_end_matches('/')) })
    }
}

#[async_trait::async_trait]
impl RagSearch for RagHttpClient {
    async fn search(&self, query: &str, top_k: Option<usize>) -> Result<SearchResponse, RagError> {
        tracing::debug!(url = %self.search_url, query_len = query.len(), "rag: search");
        let response = self
            .http
            .post(&self.search_url)
            .json(&SearchBody { query, top_k })
            .send()
            .await
            .map_err(|e| RagError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::Status { status: status.as_u16() });
        }
        let text = response.text().await.map_err(|e| RagError::Request(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| RagError::Parse(e.to_string()))
    }
}
