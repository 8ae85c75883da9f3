//! Call and request logging: in-memory sequences with durable JSON-lines journals.

mod journal;
mod scenario_log;

pub use journal::JsonlJournal;
pub use scenario_log::{ALL_REQUESTS_SUFFIX, CALLS_SUFFIX, ScenarioLog};

use sandbox_types::{CallLogEntry, RequestLogEntry};

/// Successful dispatches.
pub type CallLogger = ScenarioLog<CallLogEntry>;
/// Every inbound attempt, successful or not.
pub type RequestLogger = ScenarioLog<RequestLogEntry>;
