use super::*;

fn chat_args(args: &[&str]) -> ChatArgs {
    let mut argv = vec!["assistdesk-cli", "chat"];
    argv.extend_from_slice(args);
    match Cli::parse_from(argv).command {
        Command::Chat(args) => args,
        other => panic!("expected chat command, got {other:?}"),
    }
}

#[test]
fn chat_body_without_context() {
    let body = chat_body(&chat_args(&["Why is VPN slow?"]));
    assert_eq!(body["message"], "Why is VPN slow?");
    assert_eq!(body["maxTokens"], 200);
    assert!(body.get("context").is_none());
}

#[test]
fn chat_body_collects_page_context() {
    let body = chat_body(&chat_args(&[
        "status?",
        "--page",
        "kanban-board",
        "--ticket-id",
        "TCK-9",
        "--kanban-column",
        "Done",
        "--max-tokens",
        "50",
    ]));
    assert_eq!(
        body["context"],
        json!({ "page": "kanban-board", "ticketId": "TCK-9", "metadata": { "kanbanColumn": "Done" } })
    );
    assert_eq!(body["maxTokens"], 50);
}

#[test]
fn ran_health_takes_endpoint() {
    match Cli::parse_from(["assistdesk-cli", "--base-url", "http://h:1", "ran-health", "/api/ran/alarms"]) {
        Cli { base_url, command: Command::RanHealth { endpoint } } => {
            assert_eq!(base_url, "http://h:1");
            assert_eq!(endpoint, "/api/ran/alarms");
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn decode_body_rejects_unparsable_success_body() {
    assert!(matches!(decode_body(200, "not json"), Err(CliError::InvalidJson(_))));
    assert_eq!(decode_body(200, r#"{"ok":true}"#).unwrap(), json!({ "ok": true }));
}

#[test]
fn decode_body_keeps_raw_error_text() {
    match decode_body(502, "upstream down") {
        Err(CliError::ServerError { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}
