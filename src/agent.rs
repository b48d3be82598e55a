//! Agent that drives the model/tool loop.

use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::client::{Client, ClientError};
use crate::model::{Conversation, ModelResponse, Usage};
use crate::notify::Notifier;
use crate::options::ToolChoice;
use crate::tools::format::error_result;
use crate::tools::{
    execute, format_tool_result, registry, summarize, ToolService, WeatherReport, WeatherTools,
};

/// Why an agent run failed.
#[derive(Debug, Error)]
pub enum AgentErrorKind {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Exceeded maximum of {0} model round-trips")]
    MaxIterations(usize),
}

/// A failed run, with the tool results collected before the failure.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct AgentError {
    #[source]
    pub kind: AgentErrorKind,
    pub tool_results: Vec<WeatherReport>,
}

impl AgentError {
    fn new(kind: impl Into<AgentErrorKind>, tool_results: Vec<WeatherReport>) -> Self {
        Self {
            kind: kind.into(),
            tool_results,
        }
    }
}

/// Terminal value of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    /// The last model response: the final answer, or the reply to a reported tool error.
    pub response: ModelResponse,
    /// Tool outputs in request order.
    pub tool_results: Vec<WeatherReport>,
    pub summary: String,
    /// Token usage summed over every round-trip.
    pub usage: Usage,
    pub round_trips: usize,
    /// Set when a tool failed and the run ended after reporting it to the model.
    pub error: Option<String>,
}

impl AgentOutcome {
    fn new(
        response: ModelResponse,
        tool_results: Vec<WeatherReport>,
        usage: Usage,
        round_trips: usize,
        error: Option<String>,
    ) -> Self {
        let summary = summarize(&tool_results);
        Self {
            response,
            tool_results,
            summary,
            usage,
            round_trips,
            error,
        }
    }
}

/// Agent that executes requested tools until the model answers.
///
/// Each run:
/// 1. Sends the whole conversation and the tool registry, allowing at most one tool per turn
/// 2. Stops when the response holds no tool-use block
/// 3. Otherwise executes the tool and appends the assistant turn plus a user-role tool result
/// 4. On a tool failure, reports the error to the model once and returns that reply
///
/// Runs share nothing but the client and tools, so one agent can serve
/// many concurrent queries.
///
/// # Example
/// ```ignore
/// let client = Anthropic::create(api_key, "claude-3-5-haiku-latest".to_string());
/// let agent = Agent::new(client);
///
/// let outcome = agent.run("What's the weather like in Paris?").await?;
/// println!("{}", outcome.summary);
/// ```
pub struct Agent<C: Client, T: ToolService = WeatherTools> {
    client: C,
    tools: T,
    max_iterations: Option<usize>,
}

impl<C: Client> Agent<C> {
    /// Create an agent backed by the random weather tools.
    pub fn new(client: C) -> Self {
        Self {
            client,
            tools: WeatherTools::new(),
            max_iterations: None,
        }
    }
}

impl<C: Client, T: ToolService> Agent<C, T> {
    /// Replace the tool executor.
    pub fn with_tools<U: ToolService>(self, tools: U) -> Agent<C, U> {
        Agent {
            client: self.client,
            tools,
            max_iterations: self.max_iterations,
        }
    }

    /// Cap the number of model round-trips in the main loop. Uncapped by default.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run a query to completion.
    pub async fn run(&self, query: impl Into<String>) -> Result<AgentOutcome, AgentError> {
        self.run_with(query, None).await
    }

    /// Run a query, pushing assistant content to `notifier` after every tool round.
    pub async fn run_notified(
        &self,
        query: impl Into<String>,
        notifier: &dyn Notifier,
    ) -> Result<AgentOutcome, AgentError> {
        self.run_with(query, Some(notifier)).await
    }

    async fn run_with(
        &self,
        query: impl Into<String>,
        notifier: Option<&dyn Notifier>,
    ) -> Result<AgentOutcome, AgentError> {
        let span = info_span!("agent_run", run_id = %Uuid::new_v4());
        self.drive(Conversation::new(query), notifier)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        mut conversation: Conversation,
        notifier: Option<&dyn Notifier>,
    ) -> Result<AgentOutcome, AgentError> {
        let tools = registry();
        let tool_choice = ToolChoice::sequential();
        let mut tool_results = Vec::new();
        let mut usage = Usage::default();
        let mut round_trips = 0;

        loop {
            if let Some(max) = self.max_iterations {
                if round_trips >= max {
                    warn!("Max iterations ({}) reached in agent loop", max);
                    return Err(AgentError::new(
                        AgentErrorKind::MaxIterations(max),
                        tool_results,
                    ));
                }
            }
            round_trips += 1;
            debug!(
                "Agent round-trip {} with {} messages",
                round_trips,
                conversation.len()
            );

            let response = match self
                .client
                .request(conversation.messages(), tools, Some(&tool_choice))
                .await
            {
                Ok(response) => response,
                Err(e) => return Err(AgentError::new(e, tool_results)),
            };
            usage += response.usage;

            let Some(request) = response.tool_use() else {
                debug!("No tool use requested, agent loop complete");
                return Ok(AgentOutcome::new(
                    response,
                    tool_results,
                    usage,
                    round_trips,
                    None,
                ));
            };
            info!("Tool call requested: {} ({})", request.name, request.id);

            match execute(&self.tools, &request).await {
                Ok(data) => {
                    let result = format_tool_result(&request.id, data.as_ref());
                    if let Some(report) = data {
                        tool_results.push(report);
                    } else {
                        warn!("Tool {} returned no data", request.name);
                    }
                    if let Some(notifier) = notifier {
                        notifier.assistant_message(&response.content);
                    }
                    conversation.push_tool_round(response.content, result);
                }
                Err(err) => {
                    warn!("Tool {} execution failed: {}", request.name, err);
                    let message = err.to_string();
                    conversation.push_tool_round(
                        response.content,
                        error_result(&request.id, format!("Error: {}", message)),
                    );

                    // One recovery round-trip; whatever the model says is returned.
                    let reply = match self
                        .client
                        .request(conversation.messages(), tools, None)
                        .await
                    {
                        Ok(reply) => reply,
                        Err(e) => return Err(AgentError::new(e, tool_results)),
                    };
                    usage += reply.usage;
                    return Ok(AgentOutcome::new(
                        reply,
                        tool_results,
                        usage,
                        round_trips + 1,
                        Some(message),
                    ));
                }
            }
        }
    }
}
