use std::time::Duration;
use weather_agent::options::{ModelOptions, ToolChoice, TransportOptions};
use weather_agent::providers::{Anthropic, AnthropicModel, Provider};

#[test]
fn test_transport_options_builder() {
    let options = TransportOptions::new()
        .with_timeout(Duration::from_secs(30))
        .with_proxy("http://proxy.example.com".to_string())
        .with_header("X-Custom-Header".to_string(), "Value".to_string());

    match options {
        TransportOptions::Http {
            timeout,
            proxy,
            headers,
        } => {
            assert_eq!(timeout, Some(Duration::from_secs(30)));
            assert_eq!(proxy, Some("http://proxy.example.com".to_string()));

            let headers = headers.unwrap();
            assert_eq!(headers.get("X-Custom-Header"), Some(&"Value".to_string()));
        }
    }
}

#[test]
fn test_model_options_new() {
    let options: ModelOptions<AnthropicModel> = ModelOptions::new("claude-test");

    assert_eq!(options.model, "claude-test");
    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
    assert!(options.provider.top_k.is_none());
}

#[test]
fn test_provider_creates_client() {
    let client = Anthropic::create("test-key".to_string(), "claude-test".to_string());

    assert_eq!(client.model_options().model, "claude-test");
    assert_eq!(client.base_url(), "https://api.anthropic.com/v1");
}

#[test]
fn test_tool_choice_wire_shape() {
    assert_eq!(
        serde_json::to_value(ToolChoice::sequential()).unwrap(),
        serde_json::json!({"type": "auto", "disable_parallel_tool_use": true})
    );
}
