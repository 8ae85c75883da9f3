//! HTTP surface of the trajectory sandbox mock tools server.
//!
//! Routes:
//! - `POST /tools/{tool_name}`: dispatch a tool call
//! - `GET /tools`: catalog directory
//! - `GET /health`: liveness, current scenario, tool count
//! - `POST /set_scenario/{scenario}`: switch scenario and clear logs
//! - `GET /tool_calls`: successful calls since the last switch
//! - `GET /all_requests`: every attempt with a success/failure summary

pub mod config;
mod errors;
mod http;
mod routes;

pub use errors::ApiError;
pub use http::{RunningSandboxServer, SandboxServer};
pub use routes::{parse_request_body, router};
