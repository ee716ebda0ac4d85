use super::*;
use crate::state::test_helpers::spawn_stub;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;
use std::collections::HashMap;

fn timeouts() -> HttpTimeouts {
    HttpTimeouts { request_secs: 5, connect_secs: 2 }
}

async fn ran_stub() -> String {
    let router = Router::new()
        .route("/api/ran/live-sites", get(|| async { axum::Json(json!({ "sites": [{ "siteId": "SITE-001" }] })) }))
        .route(
            "/api/ran/live-sites/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "SITE-404" {
                    (StatusCode::NOT_FOUND, axum::Json(json!({ "error": "Site SITE-404 not found" })))
                } else {
                    (StatusCode::OK, axum::Json(json!({ "siteId": id })))
                }
            }),
        )
        .route(
            "/api/ran/combined-site-analysis/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "SITE-404" {
                    (StatusCode::NOT_FOUND, axum::Json(json!({ "error": "Site SITE-404 not found" })))
                } else {
                    (StatusCode::OK, axum::Json(json!({ "kpis": { "status": "CRITICAL" } })))
                }
            }),
        )
        .route(
            "/api/ran/alarms",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                axum::Json(json!({ "severity": params.get("severity"), "alarms": [] }))
            }),
        )
        .route("/health", get(|| async { "plain text" }));
    spawn_stub(router).await
}

#[tokio::test]
async fn typed_reads_hit_expected_paths() {
    let base = ran_stub().await;
    let client = RanHttpClient::new(&format!("{base}/"), timeouts()).unwrap();
    assert_eq!(client.base_url(), base);

    let sites = client.live_sites().await.unwrap();
    assert_eq!(sites["sites"][0]["siteId"], json!("SITE-001"));

    let site = client.live_site("SITE-002").await.unwrap();
    assert_eq!(site["siteId"], json!("SITE-002"));

    let analysis = client.combined_site_analysis("SITE-002").await.unwrap();
    assert_eq!(analysis["kpis"]["status"], json!("CRITICAL"));

    let alarms = client.alarms(Some("CRITICAL")).await.unwrap();
    assert_eq!(alarms["severity"], json!("CRITICAL"));
    let all = client.alarms(None).await.unwrap();
    assert_eq!(all["severity"], Value::Null);
}

#[tokio::test]
async fn typed_read_rejects_error_status() {
    let base = ran_stub().await;
    let client = RanHttpClient::new(&base, timeouts()).unwrap();
    let err = client.combined_site_analysis("SITE-404").await.unwrap_err();
    assert!(matches!(err, RanError::Status { status: 404 }));
    assert_eq!(err.to_string(), "RAN Services returned 404");
}

#[tokio::test]
async fn raw_read_passes_status_through() {
    let base = ran_stub().await;
    let client = RanHttpClient::new(&base, timeouts()).unwrap();
    let reply = client.get_raw("/api/ran/combined-site-analysis/SITE-404").await.unwrap();
    assert_eq!(reply.status, 404);
    assert!(!reply.ok());
    assert_eq!(reply.body["error"], json!("Site SITE-404 not found"));
}

#[tokio::test]
async fn raw_read_non_json_is_parse_error() {
    let base = ran_stub().await;
    let client = RanHttpClient::new(&base, timeouts()).unwrap();
    assert!(matches!(client.get_raw("/health").await, Err(RanError::Parse(_))));
}

#[tokio::test]
async fn site_detail_keeps_error_body() {
    let client = RanHttpClient::new(&ran_stub().await, timeouts()).unwrap();
    let detail = client.live_site("SITE-404").await.unwrap();
    assert_eq!(detail, json!({ "error": "Site SITE-404 not found" }));
}

#[test]
fn error_codes_and_retry_hints() {
    assert_eq!(RanError::Request("refused".into()).error_code(), "E_RAN_REQUEST");
    assert!(RanError::Request("refused".into()).retryable());
    assert!(RanError::Status { status: 503 }.retryable());
    assert!(!RanError::Status { status: 404 }.retryable());
    assert!(!RanError::Parse("bad".into()).retryable());
}
