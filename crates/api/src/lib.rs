//! Mock tools API client.
//!
//! A thin wrapper over `reqwest` for the HTTP contract the episode runner consumes:
//!
//! - Health-checking the server (and waiting for it to come up)
//! - Switching scenarios before an episode
//! - Forwarding tool calls verbatim and returning the raw response text
//! - Fetching the call and request logs after an episode, and bundling them into an
//!   [`EpisodeResult`]
//!
//! The primary entry point is [`MockToolsClient`].
//!
//! # Example
//!
//! ```ignore
//! use sandbox_api::MockToolsClient;
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let client = MockToolsClient::new("http://127.0.0.1:3001")?;
//! client.wait_until_healthy(Duration::from_secs(10)).await?;
//! client.set_scenario("inbox_triage").await?;
//! let text = client.call_tool("email.read", &json!({ "message_id": "42" })).await;
//! println!("{text}");
//! ```

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Url};
use sandbox_types::{AllRequestsResponse, EpisodeResult, HealthResponse, ScenarioResponse, ToolCallsResponse, ToolDirectory};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// Interval between health probes while waiting for the server.
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by [`MockToolsClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Server at {url} did not become healthy within {waited:?}")]
    Unhealthy { url: String, waited: Duration },
}

/// Client for a running mock tools server.
#[derive(Debug, Clone)]
pub struct MockToolsClient {
    base_url: Url,
    http: Client,
}

impl MockToolsClient {
    /// Create a client for `base_url`, for example `http://127.0.0.1:3001`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let invalid = |message: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            message,
        };
        let parsed = Url::parse(base_url).map_err(|error| invalid(error.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid("expected an http(s) URL with a host".to_string()));
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base_url: parsed, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send_json(self.http.get(self.endpoint(&["health"]))).await
    }

    /// Poll `/health` until it answers or `timeout` elapses.
    pub async fn wait_until_healthy(&self, timeout: Duration) -> Result<HealthResponse, ClientError> {
        let started = Instant::now();
        loop {
            match self.health().await {
                Ok(health) => return Ok(health),
                Err(error) => debug!("Health probe failed: {}", error),
            }
            if started.elapsed() >= timeout {
                return Err(ClientError::Unhealthy {
                    url: self.base_url.to_string(),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(HEALTH_POLL_INTERVAL).await;
        }
    }

    /// `POST /set_scenario/{scenario}`: switch scenario and clear the server's logs.
    pub async fn set_scenario(&self, scenario: &str) -> Result<ScenarioResponse, ClientError> {
        self.send_json(self.http.post(self.endpoint(&["set_scenario", scenario]))).await
    }

    /// `POST /tools/{tool}` with `args` as the body.
    ///
    /// Returns the raw response text whatever the status, so it can be fed back to a model
    /// verbatim. Transport failures are rendered as a JSON `{"error": ...}` string.
    pub async fn call_tool(&self, tool: &str, args: &Value) -> String {
        let result = async {
            let response = self.http.post(self.endpoint(&["tools", tool])).json(args).send().await?;
            response.text().await
        }
        .await;
        match result {
            Ok(text) => text,
            Err(error) => json!({ "error": error.to_string() }).to_string(),
        }
    }

    /// `GET /tool_calls`.
    pub async fn tool_calls(&self) -> Result<ToolCallsResponse, ClientError> {
        self.send_json(self.http.get(self.endpoint(&["tool_calls"]))).await
    }

    /// `GET /tool_calls` as untyped entries, the shape the scoring side consumes.
    pub async fn tool_calls_raw(&self) -> Result<Vec<Value>, ClientError> {
        let body: Value = self.send_json(self.http.get(self.endpoint(&["tool_calls"]))).await?;
        Ok(match body.get("calls") {
            Some(Value::Array(calls)) => calls.clone(),
            _ => Vec::new(),
        })
    }

    /// Close out an episode: fetch the call log and bundle it with the model's final response.
    ///
    /// `tool_calls_total` is the runner's own count, which includes calls the server rejected.
    pub async fn episode_result(
        &self,
        scenario: &str,
        response: &str,
        tool_calls_total: usize,
    ) -> Result<EpisodeResult, ClientError> {
        let raw = self.tool_calls_raw().await?;
        Ok(EpisodeResult::new(scenario, response, tool_calls_total, raw))
    }

    /// `GET /all_requests`.
    pub async fn all_requests(&self) -> Result<AllRequestsResponse, ClientError> {
        self.send_json(self.http.get(self.endpoint(&["all_requests"]))).await
    }

    /// `GET /tools`.
    pub async fn list_tools(&self) -> Result<ToolDirectory, ClientError> {
        self.send_json(self.http.get(self.endpoint(&["tools"]))).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
