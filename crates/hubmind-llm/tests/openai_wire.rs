//! OpenAI-dialect backend against a local mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hubmind_core::{Message, ToolDescriptor};
use hubmind_llm::backends::WireDialect;
use hubmind_llm::{LlmHandle, LlmReply};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handle(base_url: &str) -> LlmHandle {
    LlmHandle::build(
        "deepseek",
        "deepseek-chat",
        0.7,
        WireDialect::OpenAi,
        base_url,
        Some("sk-test".to_string()),
        None,
        serde_json::Map::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn chat_sends_bearer_and_returns_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "deepseek-chat"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "hello there"},
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let reply = handle(&server.uri())
        .chat(Some("be brief"), &[Message::user("hi")], &[])
        .await
        .unwrap();

    match reply {
        LlmReply::Done(text) => assert_eq!(text, "hello there"),
        other => panic!("expected Done, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_maps_tool_calls_to_raw_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "get_issues",
                            "arguments": "{\"input\": \"octo/repo\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .mount(&server)
        .await;

    let tools = vec![ToolDescriptor {
        name: "get_issues".to_string(),
        input_contract: "a repo name".to_string(),
    }];
    let reply = handle(&server.uri())
        .chat(None, &[Message::user("issues?")], &tools)
        .await
        .unwrap();

    match reply {
        LlmReply::ToolUse { tool_calls, .. } => {
            assert_eq!(tool_calls.len(), 1);
            assert_eq!(tool_calls[0].id, "call_abc");
            assert_eq!(tool_calls[0].name, "get_issues");
            assert_eq!(tool_calls[0].input, "octo/repo");
        }
        other => panic!("expected ToolUse, got {other:?}"),
    }
}

#[tokio::test]
async fn api_error_status_surfaces_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "rate limited"}
        })))
        .mount(&server)
        .await;

    let err = handle(&server.uri())
        .chat(None, &[Message::user("hi")], &[])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("429"));
}
