//! Shared type definitions for the trajectory sandbox mock tools server.
//!
//! These are the serde-facing shapes that cross crate boundaries: the declarative tool
//! catalog, call/request log records, control-endpoint payloads, and the episode result
//! consumed by the scoring collaborator.

pub mod catalog;
pub mod episode;
pub mod logs;

pub use catalog::{
    BehaviorKind, CatalogDocument, CustomSpec, FixtureListSpec, FixtureLookupSpec, RecordTransform, ToolBehavior, ToolDirectory,
    ToolDirectoryEntry, WriteActionSpec,
};
pub use episode::{EpisodeResult, count_by_tool};
pub use logs::{
    AllRequestsResponse, CallLogEntry, HealthResponse, RequestLogEntry, RequestSummary, ScenarioResponse, ToolCallsResponse,
};
