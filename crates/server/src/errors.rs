//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sandbox_engine::{DispatchError, ScenarioError};
use serde_json::json;

/// Failures surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// Tool name not in the catalog; the body lists every known tool.
    UnknownTool { detail: String, known_tools: Vec<String> },
    /// Server-side configuration fault such as a malformed fixture.
    Internal { detail: String },
    /// Request parameter that cannot be honored.
    BadRequest { detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownTool { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(error: DispatchError) -> Self {
        let detail = error.to_string();
        match error {
            DispatchError::UnknownTool { known_tools, .. } => ApiError::UnknownTool { detail, known_tools },
            DispatchError::MissingHandler { .. } | DispatchError::Fixture(_) => ApiError::Internal { detail },
        }
    }
}

impl From<ScenarioError> for ApiError {
    fn from(error: ScenarioError) -> Self {
        ApiError::BadRequest { detail: error.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::UnknownTool { detail, known_tools } => json!({ "detail": detail, "known_tools": known_tools }),
            ApiError::Internal { detail } | ApiError::BadRequest { detail } => json!({ "detail": detail }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_errors_map_to_status_codes() {
        let unknown = ApiError::from(DispatchError::unknown_tool("x", vec!["a".into()]));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let missing = ApiError::from(DispatchError::missing_handler("t", "h"));
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid = ApiError::from(ScenarioError::invalid_name("..", "must not be a relative directory marker"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
