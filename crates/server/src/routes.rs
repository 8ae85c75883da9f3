//! Route handlers for the mock tools HTTP surface.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use sandbox_engine::Engine;
use sandbox_types::{AllRequestsResponse, HealthResponse, RequestLogEntry, ScenarioResponse, ToolCallsResponse, ToolDirectory};
use sandbox_util::json_preview;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::errors::ApiError;

const BODY_PREVIEW_MAX_CHARS: usize = 500;

/// Build the router serving every endpoint against a shared engine.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/tools/{*tool_name}", post(invoke_tool))
        .route("/tools", get(list_tools))
        .route("/health", get(health))
        .route("/set_scenario/{scenario}", post(set_scenario))
        .route("/tool_calls", get(tool_calls))
        .route("/all_requests", get(all_requests))
        .with_state(engine)
}

async fn invoke_tool(State(engine): State<Arc<Engine>>, Path(tool_name): Path<String>, body: Bytes) -> Response {
    let request_body = parse_request_body(&body);
    debug!("REQUEST POST /tools/{} body={}", tool_name, json_preview(&request_body, BODY_PREVIEW_MAX_CHARS));
    let args = match &request_body {
        Some(Value::Object(fields)) => fields.clone(),
        _ => Map::new(),
    };

    let session = engine.session().await;
    let response = match session.invoke(&tool_name, &args).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => ApiError::from(error).into_response(),
    };
    session
        .record_request(RequestLogEntry::new(tool_name, request_body, response.status().as_u16()))
        .await;
    response
}

/// Request body as logged: `None` when empty, `{"_raw": ...}` when not JSON.
pub fn parse_request_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(_) => Some(json!({ "_raw": String::from_utf8_lossy(body) })),
    }
}

async fn health(State(engine): State<Arc<Engine>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        scenario: engine.current_scenario().await,
        tools_available: engine.tool_count(),
    })
}

async fn set_scenario(State(engine): State<Arc<Engine>>, Path(scenario): Path<String>) -> Result<Json<ScenarioResponse>, ApiError> {
    let scenario = engine.set_scenario(&scenario).await?;
    Ok(Json(ScenarioResponse { scenario }))
}

async fn tool_calls(State(engine): State<Arc<Engine>>) -> Json<ToolCallsResponse> {
    Json(ToolCallsResponse {
        calls: engine.tool_calls(),
    })
}

async fn all_requests(State(engine): State<Arc<Engine>>) -> Json<AllRequestsResponse> {
    Json(AllRequestsResponse::new(engine.all_requests()))
}

async fn list_tools(State(engine): State<Arc<Engine>>) -> Json<ToolDirectory> {
    Json(engine.directory())
}
