//! Aggregated episode result handed to the scoring collaborator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one agent episode run against the mock tools server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EpisodeResult {
    pub scenario: String,
    /// Prompt variant the episode ran with.
    #[serde(default)]
    pub variant: Option<String>,
    /// Final assistant response text.
    pub response: String,
    /// Number of tool calls the model issued, including failed ones.
    pub tool_calls_total: usize,
    /// Raw success log fetched from `GET /tool_calls`.
    pub tool_calls_raw: Vec<Value>,
    /// Success log grouped by tool name.
    pub tool_calls_by_type: IndexMap<String, usize>,
}

impl EpisodeResult {
    /// Build a result from the raw call log, deriving the per-tool counts.
    pub fn new(scenario: impl Into<String>, response: impl Into<String>, tool_calls_total: usize, tool_calls_raw: Vec<Value>) -> Self {
        let tool_calls_by_type = count_by_tool(&tool_calls_raw);
        Self {
            scenario: scenario.into(),
            variant: None,
            response: response.into(),
            tool_calls_total,
            tool_calls_raw,
            tool_calls_by_type,
        }
    }
}

/// Count call-log entries per `tool` field, in first-seen order.
///
/// Entries without a string `tool` field are counted under `unknown`.
pub fn count_by_tool(calls: &[Value]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for call in calls {
        let tool = call.get("tool").and_then(Value::as_str).unwrap_or("unknown");
        *counts.entry(tool.to_string()).or_insert(0) += 1;
    }
    counts
}
