//! Core client trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Message, ModelResponse};
use crate::options::ToolChoice;
use crate::tools::ToolDescriptor;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A stateless remote model endpoint.
///
/// Every call carries the complete conversation; nothing is remembered
/// between requests.
#[async_trait]
pub trait Client: Send + Sync {
    /// Provider-specific model options type.
    type ModelProvider: Send + Sync;

    /// Send the conversation and tool registry, returning the model's reply.
    async fn request(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
        tool_choice: Option<&ToolChoice>,
    ) -> Result<ModelResponse, ClientError>;
}
