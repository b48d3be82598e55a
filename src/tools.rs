//! Tool registry, typed tool calls and dispatch.
//!
//! Every tool the model can see is a [`ToolName`] variant. The registry handed
//! to the model and the dispatch in [`ToolCall::parse`] are both derived from
//! that enum, so a registered tool can never fail with "unknown tool".

use async_trait::async_trait;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::ToolInvocationRequest;

pub mod format;
pub mod weather;

pub use format::{format_tool_result, summarize};
pub use weather::{ForecastInput, TemperatureUnit, WeatherInput, WeatherReport, WeatherTools};

/// Error type for tool parsing and execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The model asked for a tool that is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for {tool}: {reason}")]
    InvalidInput { tool: ToolName, reason: String },

    #[error("Tool execution failed: {0}")]
    Execution(String),
}

/// Outcome of one tool execution. `Ok(None)` means the tool ran but had no data.
pub type ToolResult = Result<Option<WeatherReport>, ToolError>;

/// Static description of a tool, as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// The closed set of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetWeather,
    GetForecast,
}

impl ToolName {
    /// Registry order.
    pub const ALL: [ToolName; 2] = [ToolName::GetWeather, ToolName::GetForecast];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetWeather => "get_weather",
            ToolName::GetForecast => "get_forecast",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ToolName::GetWeather => concat!(
                "Get the current weather for a location. This tool provides current temperature and weather conditions.\n",
                "- When a city is provided without a specific area, it returns weather for the city center\n",
                "- Temperature can be returned in either Celsius (default) or Fahrenheit\n",
                "- The location parameter should include both city and country/state for accuracy\n",
                "- Returns current temperature and general weather conditions",
            ),
            ToolName::GetForecast => concat!(
                "Get the weather forecast for the next few days.\n",
                "- Provides forecast data including temperature and conditions\n",
                "- Returns forecast for the next 3 days by default\n",
                "- Temperature can be in Celsius or Fahrenheit\n",
                "- Location should include city and country/state",
            ),
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        let input_schema = match self {
            ToolName::GetWeather => input_schema::<WeatherInput>(),
            ToolName::GetForecast => input_schema::<ForecastInput>(),
        };
        ToolDescriptor {
            name: self.as_str(),
            description: self.description(),
            input_schema,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }
}

static REGISTRY: LazyLock<Vec<ToolDescriptor>> =
    LazyLock::new(|| ToolName::ALL.into_iter().map(ToolName::descriptor).collect());

/// All tool descriptors, in registry order. Built once, never mutated.
pub fn registry() -> &'static [ToolDescriptor] {
    &REGISTRY
}

/// JSON schema for a tool input type, with subschemas inlined and the
/// root title and meta-schema stripped.
fn input_schema<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.option_add_null_type = false;
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| json!({ "type": "object" }));
    if let Some(object) = schema.as_object_mut() {
        object.remove("title");
        object.remove("description");
    }
    schema
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    GetWeather(WeatherInput),
    GetForecast(ForecastInput),
}

impl ToolCall {
    /// Resolve a tool name and validate its raw input.
    ///
    /// `input` may be a JSON object or a string holding JSON text.
    pub fn parse(name: &str, input: &Value) -> Result<Self, ToolError> {
        let tool: ToolName = name.parse()?;
        let input = match input {
            Value::String(raw) => serde_json::from_str(raw).map_err(|e| ToolError::InvalidInput {
                tool,
                reason: format!("input is not valid JSON: {}", e),
            })?,
            other => other.clone(),
        };

        match tool {
            ToolName::GetWeather => {
                let input: WeatherInput = decode(tool, input)?;
                input.validate().map_err(|reason| ToolError::InvalidInput { tool, reason })?;
                Ok(ToolCall::GetWeather(input))
            }
            ToolName::GetForecast => {
                let input: ForecastInput = decode(tool, input)?;
                input.validate().map_err(|reason| ToolError::InvalidInput { tool, reason })?;
                Ok(ToolCall::GetForecast(input))
            }
        }
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolCall::GetWeather(_) => ToolName::GetWeather,
            ToolCall::GetForecast(_) => ToolName::GetForecast,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput {
        tool,
        reason: e.to_string(),
    })
}

/// Executes validated tool calls.
#[async_trait]
pub trait ToolService: Send + Sync {
    async fn call(&self, call: ToolCall) -> ToolResult;
}

/// Parse a model's tool request and run it on `service`.
///
/// Failures are returned immediately; nothing is retried.
pub async fn execute<S: ToolService + ?Sized>(
    service: &S,
    request: &ToolInvocationRequest,
) -> ToolResult {
    let call = ToolCall::parse(&request.name, &request.input)?;
    info!("Executing tool: {}", call.name());
    debug!("Tool input: {:?}", call);
    service.call(call).await
}
