//! # weather_agent
//!
//! A small agent loop that lets a remote model call weather tools until it
//! produces a final answer.
//!
//! ## Architecture
//!
//! 1. **Tools** are a closed set ([`tools::ToolName`]); their descriptors form a
//!    static registry and their inputs are validated into typed [`tools::ToolCall`]s.
//! 2. **Clients** send the full conversation plus the registry to a stateless model
//!    endpoint ([`providers::Anthropic`] builds one).
//! 3. **Agents** wrap a client, execute requested tools one at a time, feed results
//!    back, and summarize what was collected.
//!
//! ## Example
//! ```no_run
//! use weather_agent::config::Config;
//! use weather_agent::Agent;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let agent = Agent::new(config.client());
//!
//!     let outcome = agent.run("What's the weather like in Paris?").await?;
//!     println!("{}", outcome.summary);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod client;
pub mod config;
pub mod http;
pub mod model;
pub mod notify;
pub mod options;
pub mod providers;
pub mod tools;

pub use agent::{Agent, AgentError, AgentErrorKind, AgentOutcome};
pub use client::{Client, ClientError};
pub use model::{ContentBlock, Conversation, Message, ModelResponse};
pub use notify::{AssistantMessage, ChannelNotifier, Notifier};
pub use tools::{ToolCall, ToolDescriptor, ToolError, ToolService, WeatherReport};
