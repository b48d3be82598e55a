use serde_json::json;
use weather_agent::client::{Client, ClientError};
use weather_agent::model::{Content, ContentBlock, Message, StopReason};
use weather_agent::options::{ModelOptions, ToolChoice, TransportOptions};
use weather_agent::providers::AnthropicClient;
use weather_agent::tools::registry;
use weather_agent::Agent;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AnthropicClient {
    AnthropicClient::new(
        "test-key".to_string(),
        format!("{}/v1", server.uri()),
        ModelOptions::new("claude-test"),
        TransportOptions::default(),
    )
}

fn user_msg(text: &str) -> Message {
    Message::User(Content::Text(text.to_string()))
}

fn tool_use_body() -> serde_json::Value {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-test",
        "content": [
            {"type": "thinking", "thinking": "...", "signature": "sig"},
            {"type": "text", "text": "Checking Paris."},
            {"type": "tool_use", "id": "toolu_01", "name": "get_weather", "input": {"location": "Paris"}}
        ],
        "stop_reason": "tool_use",
        "stop_sequence": null,
        "usage": {"input_tokens": 15, "output_tokens": 8}
    })
}

fn text_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_02",
        "type": "message",
        "role": "assistant",
        "model": "claude-test",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 30, "output_tokens": 12}
    })
}

#[tokio::test]
async fn sends_headers_and_parses_tool_use() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-test",
            "max_tokens": 1024,
            "tool_choice": {"type": "auto", "disable_parallel_tool_use": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_use_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .request(
            &[user_msg("Weather in Paris?")],
            registry(),
            Some(&ToolChoice::sequential()),
        )
        .await
        .unwrap();

    assert_eq!(response.id, "msg_01");
    assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
    assert_eq!(response.usage.input_tokens, 15);
    assert_eq!(response.content[0], ContentBlock::Unsupported);

    let request = response.tool_use().unwrap();
    assert_eq!(request.id, "toolu_01");
    assert_eq!(request.name, "get_weather");
    assert_eq!(request.input, json!({"location": "Paris"}));
}

#[tokio::test]
async fn error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .request(&[user_msg("Hi")], registry(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ProviderError(_)));
    assert_eq!(err.to_string(), "Anthropic API Error: invalid x-api-key");
}

#[tokio::test]
async fn agent_round_trip_over_http() {
    let server = MockServer::start().await;

    // Second request carries the tool result; match it first.
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user", "content": "Weather in Paris?"},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Checking Paris."},
                    {"type": "tool_use", "id": "toolu_01", "name": "get_weather", "input": {"location": "Paris"}}
                ]},
                {"role": "user", "content": [{"type": "tool_result", "tool_use_id": "toolu_01"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("Sunny in Paris.")))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_use_body()))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let outcome = Agent::new(client(&server))
        .run("Weather in Paris?")
        .await
        .unwrap();

    assert_eq!(outcome.response.text(), "Sunny in Paris.");
    assert_eq!(outcome.tool_results.len(), 1);
    assert_eq!(outcome.tool_results[0].location, "Paris");
    assert!(outcome.summary.starts_with("Weather Information Summary:\n1. Paris: "));
    assert_eq!(outcome.usage.input_tokens, 45);
}
