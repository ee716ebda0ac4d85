use super::*;
use crate::state::test_helpers::read_json;

#[tokio::test]
async fn bad_request_renders_plain_error_body() {
    let response = ApiError::BadRequest("Message is required".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body, json!({ "error": "Message is required" }));
}

#[tokio::test]
async fn upstream_renders_success_false() {
    let response = ApiError::Upstream("vLLM API error: 502".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("vLLM API error: 502"));
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ApiError::BadRequest(String::new()).error_code(), "E_BAD_REQUEST");
    assert_eq!(ApiError::Upstream(String::new()).error_code(), "E_UPSTREAM");
    assert!(!ApiError::Upstream(String::new()).retryable());
}
