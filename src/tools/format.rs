//! Conversion of tool output into tool-result blocks and run summaries.

use itertools::Itertools;

use super::WeatherReport;
use crate::model::{ContentBlock, ToolResultContent};

pub const NO_DATA: &str = "No data available";

const SUMMARY_HEADER: &str = "Weather Information Summary:";

/// One-line description of a report, e.g. `20°C, sunny (5-day forecast)`.
pub fn describe(report: &WeatherReport) -> String {
    let mut text = format!(
        "{}°{}, {}",
        report.temperature,
        report.unit.initial(),
        report.conditions
    );
    if let Some(days) = report.forecast_days {
        text.push_str(&format!(" ({}-day forecast)", days));
    }
    text
}

/// Build the tool-result block for a tool's output.
///
/// Missing data is reported as an error block so the model can react to it.
pub fn format_tool_result(tool_use_id: &str, data: Option<&WeatherReport>) -> ContentBlock {
    match data {
        Some(report) => ContentBlock::ToolResult {
            tool_use_id: tool_use_id.to_string(),
            content: vec![ToolResultContent::Text {
                text: describe(report),
            }],
            is_error: None,
        },
        None => error_result(tool_use_id, NO_DATA),
    }
}

/// A tool-result block flagged as an error.
pub fn error_result(tool_use_id: &str, text: impl Into<String>) -> ContentBlock {
    ContentBlock::ToolResult {
        tool_use_id: tool_use_id.to_string(),
        content: vec![ToolResultContent::Text { text: text.into() }],
        is_error: Some(true),
    }
}

/// Numbered summary of every collected report.
pub fn summarize(reports: &[WeatherReport]) -> String {
    let lines = reports
        .iter()
        .enumerate()
        .map(|(index, report)| format!("{}. {}: {}", index + 1, report.location, describe(report)))
        .join("\n");
    format!("{}\n{}", SUMMARY_HEADER, lines)
}
