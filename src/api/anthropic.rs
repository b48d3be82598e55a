//! Anthropic Messages API client implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::client::{Client, ClientError};
use crate::http::{add_extra_headers, build_http_client, RequestBuilderExt, ResponseExt};
use crate::model::{ContentBlock, Message, ModelResponse, StopReason, Usage};
use crate::options::{ModelOptions, ToolChoice, TransportOptions};
use crate::tools::ToolDescriptor;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic model options.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnthropicModel {
    pub top_k: Option<u32>,
    pub metadata: Option<serde_json::Value>,
}

/// Anthropic client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    api_version: String,
    model_options: ModelOptions<AnthropicModel>,
    transport_options: TransportOptions,
}

impl AnthropicClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model_options: ModelOptions<AnthropicModel>,
        transport_options: TransportOptions,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: ANTHROPIC_VERSION.to_string(),
            model_options,
            transport_options,
        }
    }

    /// Override the `anthropic-version` header.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model_options(&self) -> &ModelOptions<AnthropicModel> {
        &self.model_options
    }

    fn headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| ClientError::Config("Invalid API key".to_string()))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.api_version)
                .map_err(|_| ClientError::Config("Invalid API version".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn handle_error_response(status: reqwest::StatusCode, body: &str) -> ClientError {
        match serde_json::from_str::<AnthropicErrorResponse>(body) {
            Ok(error_resp) => ClientError::ProviderError(format!(
                "Anthropic API Error: {}",
                error_resp
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "Unknown error".to_string())
            )),
            Err(_) => ClientError::ProviderError(format!(
                "Anthropic API Error: HTTP {}: {}",
                status, body
            )),
        }
    }
}

#[async_trait]
impl Client for AnthropicClient {
    type ModelProvider = AnthropicModel;

    async fn request(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
        tool_choice: Option<&ToolChoice>,
    ) -> Result<ModelResponse, ClientError> {
        let url = format!("{}/messages", self.base_url);

        if self.model_options.model.is_empty() {
            return Err(ClientError::Config("Model must be specified".to_string()));
        }

        let request_body = AnthropicRequest::new(messages, &self.model_options, tools, tool_choice);

        let http_client = build_http_client(&self.transport_options)?;
        let mut req = http_client.post(&url).headers(self.headers()?);
        req = add_extra_headers(req, &self.transport_options);

        let response = req.json_logged(&request_body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            return Err(Self::handle_error_response(status, &body));
        }

        let anthropic_response: AnthropicResponse = response.json_logged().await?;
        Ok(anthropic_response.into())
    }
}

// --- Request Types ---

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    system: Option<&'a str>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDescriptor],
    tool_choice: Option<&'a ToolChoice>,
    #[serde(flatten)]
    provider_options: &'a AnthropicModel,
}

fn no_tools(tools: &&[ToolDescriptor]) -> bool {
    tools.is_empty()
}

impl<'a> AnthropicRequest<'a> {
    fn new(
        messages: &'a [Message],
        model_options: &'a ModelOptions<AnthropicModel>,
        tools: &'a [ToolDescriptor],
        tool_choice: Option<&'a ToolChoice>,
    ) -> Self {
        AnthropicRequest {
            model: &model_options.model,
            messages,
            max_tokens: model_options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: model_options.system.as_deref(),
            temperature: model_options.temperature,
            top_p: model_options.top_p,
            tools,
            // The API rejects a tool choice without tools.
            tool_choice: tool_choice.filter(|_| !tools.is_empty()),
            provider_options: &model_options.provider,
        }
    }
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: Option<AnthropicError>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    message: Option<String>,
}

impl From<AnthropicResponse> for ModelResponse {
    fn from(resp: AnthropicResponse) -> Self {
        ModelResponse {
            id: resp.id,
            model: resp.model,
            content: resp.content,
            stop_reason: resp.stop_reason.as_deref().map(StopReason::from),
            usage: Usage {
                input_tokens: resp.usage.input_tokens,
                output_tokens: resp.usage.output_tokens,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Content;
    use crate::tools::registry;
    use serde_json::json;

    #[test]
    fn request_body_carries_tools_and_sequential_choice() {
        let options = ModelOptions::<AnthropicModel>::new("claude-test");
        let messages = vec![Message::User(Content::Text("Weather in Paris?".into()))];
        let choice = ToolChoice::sequential();
        let body = serde_json::to_value(AnthropicRequest::new(
            &messages,
            &options,
            registry(),
            Some(&choice),
        ))
        .unwrap();

        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(
            body["messages"],
            json!([{"role": "user", "content": "Weather in Paris?"}])
        );
        assert_eq!(
            body["tool_choice"],
            json!({"type": "auto", "disable_parallel_tool_use": true})
        );
        assert_eq!(body["tools"].as_array().unwrap().len(), 2);
        assert!(body.get("system").is_none());
        assert!(body.get("top_k").is_none());
    }

    #[test]
    fn tool_choice_dropped_without_tools() {
        let options = ModelOptions::<AnthropicModel>::new("claude-test");
        let choice = ToolChoice::sequential();
        let body =
            serde_json::to_value(AnthropicRequest::new(&[], &options, &[], Some(&choice))).unwrap();

        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn error_message_is_used_verbatim() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens: too large"}}"#;
        let err = AnthropicClient::handle_error_response(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(err.to_string(), "Anthropic API Error: max_tokens: too large");

        let err = AnthropicClient::handle_error_response(reqwest::StatusCode::BAD_REQUEST, "{}");
        assert_eq!(err.to_string(), "Anthropic API Error: Unknown error");
    }
}
