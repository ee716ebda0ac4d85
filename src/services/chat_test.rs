use super::*;
use crate::rag::{ContextMetadata, RagContext};
use crate::state::test_helpers::{MockCompletion, MockRag};
use crate::types::ContextInfo;
use serde_json::{Map, json};

fn request(message: &str) -> ChatRequest {
    serde_json::from_value(json!({ "message": message })).unwrap()
}

fn ticket_context() -> RagContext {
    RagContext {
        text: "VPN drops".into(),
        score: 0.9,
        metadata: ContextMetadata {
            kind: "ticket".into(),
            original: json!({ "ticketId": "TCK-7", "title": "VPN drops" }),
            extra: Map::new(),
        },
    }
}

// =========================================================================
// answer
// =========================================================================

#[tokio::test]
async fn blank_message_is_rejected() {
    let llm = MockCompletion::ok("unused");
    let rag = MockRag::down();
    let err = answer(Some(llm.as_ref()), rag.as_ref(), &request("   ")).await.unwrap_err();
    assert!(matches!(err, ChatError::EmptyMessage));
    assert_eq!(err.to_string(), "Message is required");
    assert!(llm.requests().is_empty());
    assert!(rag.queries().is_empty());
}

#[tokio::test]
async fn answer_uses_rag_context_and_trims() {
    let llm = MockCompletion::ok("  Restart the VPN client.  ");
    let rag = MockRag::with_contexts(vec![ticket_context()]);
    let reply = answer(Some(llm.as_ref()), rag.as_ref(), &request("VPN keeps dropping")).await.unwrap();

    assert!(reply.success);
    assert_eq!(reply.text, "Restart the VPN client.");
    assert!(reply.has_context);
    assert_eq!(reply.usage.completion_tokens, 27);
    assert_eq!(rag.queries(), vec![("VPN keeps dropping".to_string(), Some(RAG_TOP_K))]);

    let sent = llm.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].prompt.contains("1. [ticket] Ticket TCK-7: VPN drops"));
    assert!(sent[0].prompt.ends_with("User Question: VPN keeps dropping\n\nAssistant Response:"));
    assert_eq!(sent[0].stop, STOP_SEQUENCES.map(String::from).to_vec());
    assert_eq!(sent[0].max_tokens, 200);
    assert_eq!(reply.usage.prompt_tokens, sent[0].prompt.chars().count() as u64);
}

#[tokio::test]
async fn rag_failure_does_not_block_answer() {
    let llm = MockCompletion::ok("answer");
    let rag = MockRag::down();
    let reply = answer(Some(llm.as_ref()), rag.as_ref(), &request("hello")).await.unwrap();
    assert_eq!(reply.text, "answer");
    assert!(!reply.has_context);
    assert!(!llm.requests()[0].prompt.contains("Relevant Context"));
}

#[tokio::test]
async fn unsuccessful_rag_reply_means_no_context() {
    let llm = MockCompletion::ok("answer");
    let rag = MockRag {
        response: Some(crate::rag::SearchResponse {
            success: false,
            contexts: vec![ticket_context()],
            query: None,
            error: Some("index missing".into()),
        }),
        ..MockRag::default()
    };
    let reply = answer(Some(llm.as_ref()), &rag, &request("hello")).await.unwrap();
    assert!(!reply.has_context);
}

#[tokio::test]
async fn page_context_reaches_prompt() {
    let llm = MockCompletion::ok("ok");
    let rag = MockRag::down();
    let mut req = request("what next?");
    req.context = Some(ContextInfo { page: Some("ticket-detail".into()), ..ContextInfo::default() });
    answer(Some(llm.as_ref()), rag.as_ref(), &req).await.unwrap();
    let prompt = &llm.requests()[0].prompt;
    assert!(prompt.contains("- User is viewing: ticket-detail"));
    assert!(prompt.contains("context-aware responses"));
}

#[tokio::test]
async fn missing_vllm_is_configuration_error() {
    let rag = MockRag::down();
    let err = answer(None, rag.as_ref(), &request("hello")).await.unwrap_err();
    assert_eq!(err.to_string(), "VLLM_API_URL environment variable is not set");
}

#[tokio::test]
async fn vllm_failure_surfaces_status() {
    let llm = MockCompletion::failing();
    let rag = MockRag::down();
    let err = answer(Some(llm.as_ref()), rag.as_ref(), &request("hello")).await.unwrap_err();
    assert_eq!(err.to_string(), "vLLM API error: 502");
}

// =========================================================================
// health
// =========================================================================

#[tokio::test]
async fn health_without_vllm_is_not_configured() {
    assert_eq!(health(None, MockRag::down().as_ref()).await, HealthReport::NotConfigured);
}

#[tokio::test]
async fn health_reports_each_dependency() {
    let llm = MockCompletion::ok("H");
    let rag = MockRag::down();
    let report = health(Some(llm.as_ref()), rag.as_ref()).await;
    assert_eq!(
        report,
        HealthReport::Checked { vllm_healthy: true, rag_healthy: false, vllm_url: "http://vllm.test".into() }
    );
    let probe = &llm.requests()[0];
    assert_eq!(probe.prompt, "Hi");
    assert_eq!(probe.max_tokens, 1);
    assert!(probe.stop.is_empty());
    assert_eq!(rag.queries(), vec![("test".to_string(), Some(1))]);
}

#[tokio::test]
async fn health_marks_vllm_error_status_unhealthy() {
    let llm = MockCompletion::failing();
    let rag = MockRag::with_contexts(Vec::new());
    let report = health(Some(llm.as_ref()), rag.as_ref()).await;
    assert_eq!(
        report,
        HealthReport::Checked { vllm_healthy: false, rag_healthy: true, vllm_url: "http://vllm.test".into() }
    );
}

#[test]
fn public_url_hides_completions_path() {
    assert_eq!(public_vllm_url("https://llm.example/v1/completions"), "https://llm.example");
    assert_eq!(public_vllm_url("https://llm.example/generate"), "https://llm.example/generate");
}
