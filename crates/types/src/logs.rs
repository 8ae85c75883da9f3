//! Call and request log records plus the control-endpoint payloads that expose them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One successful tool dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallLogEntry {
    /// Time the dispatch completed.
    pub ts: DateTime<Utc>,
    /// Catalog tool name.
    pub tool: String,
    /// Arguments the tool was invoked with.
    pub args: Map<String, Value>,
    /// Truncated textual preview of the result.
    pub result_summary: String,
}

/// One inbound `POST /tools/*` attempt, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestLogEntry {
    pub ts: DateTime<Utc>,
    /// Tool path segment as received, including unknown names.
    pub tool: String,
    /// Parsed request body; `null` when empty, `{"_raw": ...}` when not JSON.
    pub request_body: Option<Value>,
    pub status_code: u16,
    pub success: bool,
}

impl RequestLogEntry {
    /// Create an entry stamped now; success is derived from the 2xx range.
    pub fn new(tool: impl Into<String>, request_body: Option<Value>, status_code: u16) -> Self {
        Self {
            ts: Utc::now(),
            tool: tool.into(),
            request_body,
            status_code,
            success: (200..300).contains(&status_code),
        }
    }
}

/// Payload of `GET /tool_calls`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCallsResponse {
    pub calls: Vec<CallLogEntry>,
}

/// Success/failure tally over the request log.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

impl RequestSummary {
    /// Tally a sequence of request log entries.
    pub fn from_entries(entries: &[RequestLogEntry]) -> Self {
        let success = entries.iter().filter(|entry| entry.success).count();
        Self {
            total: entries.len(),
            success,
            failed: entries.len() - success,
        }
    }
}

/// Payload of `GET /all_requests`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllRequestsResponse {
    pub requests: Vec<RequestLogEntry>,
    pub summary: RequestSummary,
}

impl AllRequestsResponse {
    pub fn new(requests: Vec<RequestLogEntry>) -> Self {
        let summary = RequestSummary::from_entries(&requests);
        Self { requests, summary }
    }
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub scenario: String,
    pub tools_available: usize,
}

/// Payload of `POST /set_scenario/{scenario}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioResponse {
    pub scenario: String,
}
