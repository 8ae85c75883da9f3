//! Engine facade tying dispatch, scenario switching, and logging together.
//!
//! A [`Session`] pins the current scenario for one inbound request. Everything the request
//! does (fixture reads, the behavior, both log appends) happens under that pin, and
//! [`Engine::set_scenario`] waits for open sessions before switching and clearing the logs.

use std::path::PathBuf;

use chrono::Utc;
use sandbox_types::{CallLogEntry, RequestLogEntry, ToolDirectory};
use sandbox_util::json_preview;
use serde_json::{Map, Value};
use tokio::sync::RwLockReadGuard;
use tracing::{info, warn};

use crate::catalog::ToolCatalog;
use crate::dispatch::ToolDispatcher;
use crate::error::{DispatchError, EngineError, ScenarioError};
use crate::fixtures::FixtureStore;
use crate::handlers::HandlerRegistry;
use crate::logging::{ALL_REQUESTS_SUFFIX, CALLS_SUFFIX, CallLogger, JsonlJournal, RequestLogger};
use crate::scenario::{ScenarioContext, validate_scenario_name};

/// Characters of a result kept in a call log entry.
pub const RESULT_SUMMARY_MAX_CHARS: usize = 200;
/// Characters of the arguments shown in invocation diagnostics.
pub const ARGS_PREVIEW_MAX_CHARS: usize = 500;

/// Filesystem roots and the initial scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub fixtures_path: PathBuf,
    pub log_path: PathBuf,
    pub scenario: String,
}

/// Shared engine state; wrap in an `Arc` to serve concurrent requests.
#[derive(Debug)]
pub struct Engine {
    dispatcher: ToolDispatcher,
    scenario: ScenarioContext,
    calls: CallLogger,
    requests: RequestLogger,
}

impl Engine {
    /// Build an engine, validating the catalog and the initial scenario name.
    pub fn new(settings: EngineSettings, catalog: ToolCatalog, handlers: HandlerRegistry) -> Result<Self, EngineError> {
        let dispatcher = ToolDispatcher::new(catalog, handlers, FixtureStore::new(settings.fixtures_path))?;
        let scenario = ScenarioContext::new(settings.scenario)?;
        let journal = JsonlJournal::new(settings.log_path);
        Ok(Self {
            dispatcher,
            scenario,
            calls: CallLogger::new(journal.clone(), CALLS_SUFFIX),
            requests: RequestLogger::new(journal, ALL_REQUESTS_SUFFIX),
        })
    }

    /// Engine serving the built-in catalog and handlers.
    pub fn with_builtin_catalog(settings: EngineSettings) -> Result<Self, EngineError> {
        Self::new(settings, ToolCatalog::builtin(), HandlerRegistry::builtin())
    }

    /// Open a session pinned to the current scenario.
    pub async fn session(&self) -> Session<'_> {
        Session {
            engine: self,
            scenario: self.scenario.read().await,
        }
    }

    pub async fn current_scenario(&self) -> String {
        self.scenario.get_current().await
    }

    /// Switch scenarios and clear both log sequences in one step.
    pub async fn set_scenario(&self, name: &str) -> Result<String, ScenarioError> {
        validate_scenario_name(name)?;
        let mut current = self.scenario.write().await;
        *current = name.to_string();
        let dropped_calls = self.calls.clear();
        let dropped_requests = self.requests.clear();
        info!(
            "Scenario reset to: {} (cleared {} calls, {} requests)",
            name, dropped_calls, dropped_requests
        );
        Ok(current.clone())
    }

    /// Successful calls recorded since the last switch.
    pub fn tool_calls(&self) -> Vec<CallLogEntry> {
        self.calls.snapshot()
    }

    /// Every attempt recorded since the last switch.
    pub fn all_requests(&self) -> Vec<RequestLogEntry> {
        self.requests.snapshot()
    }

    pub fn directory(&self) -> ToolDirectory {
        self.dispatcher.catalog().directory()
    }

    pub fn tool_count(&self) -> usize {
        self.dispatcher.catalog().len()
    }
}

/// One request's view of the engine, holding the scenario steady until dropped.
#[derive(Debug)]
pub struct Session<'a> {
    engine: &'a Engine,
    scenario: RwLockReadGuard<'a, String>,
}

impl Session<'_> {
    /// Scenario this session is pinned to.
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Dispatch a tool and record it in the call log when it succeeds.
    pub async fn invoke(&self, tool: &str, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        info!("TOOL {:<25} body={}", tool, json_preview(args, ARGS_PREVIEW_MAX_CHARS));

        let result = self.engine.dispatcher.dispatch(&self.scenario, tool, args)?;
        let entry = CallLogEntry {
            ts: Utc::now(),
            tool: tool.to_string(),
            args: args.clone(),
            result_summary: json_preview(&result, RESULT_SUMMARY_MAX_CHARS),
        };
        self.engine.calls.record(&self.scenario, entry).await;
        Ok(result)
    }

    /// Record an inbound attempt, flagging failures.
    pub async fn record_request(&self, entry: RequestLogEntry) {
        if entry.status_code >= 400 {
            warn!("FAILED /tools/{} status={}", entry.tool, entry.status_code);
        }
        self.engine.requests.record(&self.scenario, entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn engine(temp_dir: &TempDir) -> Engine {
        Engine::with_builtin_catalog(EngineSettings {
            fixtures_path: temp_dir.path().join("fixtures"),
            log_path: temp_dir.path().join("logs"),
            scenario: "inbox_triage".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn successful_invocations_are_logged() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);
        let args = json!({ "title": "Standup" }).as_object().cloned().unwrap();

        let session = engine.session().await;
        session.invoke("calendar.create", &args).await.unwrap();
        assert!(session.invoke("calendar.teleport", &args).await.is_err());
        drop(session);

        let calls = engine.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool, "calendar.create");
        assert_eq!(calls[0].args["title"], "Standup");
        assert!(calls[0].result_summary.chars().count() <= RESULT_SUMMARY_MAX_CHARS);

        let journal = std::fs::read_to_string(temp_dir.path().join("logs").join("inbox_triage_calls.jsonl")).unwrap();
        assert_eq!(journal.lines().count(), 1);
    }

    #[tokio::test]
    async fn switching_clears_logs_and_rejects_bad_names() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);
        {
            let session = engine.session().await;
            session.invoke("memory.write", &Map::new()).await.unwrap();
            session.record_request(RequestLogEntry::new("memory.write", None, 200)).await;
        }
        assert_eq!(engine.tool_calls().len(), 1);
        assert_eq!(engine.all_requests().len(), 1);

        assert_eq!(engine.set_scenario("morning_brief").await.unwrap(), "morning_brief");
        assert!(engine.tool_calls().is_empty());
        assert!(engine.all_requests().is_empty());
        assert_eq!(engine.current_scenario().await, "morning_brief");

        assert!(engine.set_scenario("../etc").await.is_err());
        assert_eq!(engine.current_scenario().await, "morning_brief");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn switch_waits_for_open_session_and_drops_its_entries() {
        let temp_dir = TempDir::new().unwrap();
        let next = temp_dir.path().join("fixtures").join("client_escalation");
        std::fs::create_dir_all(&next).unwrap();
        std::fs::write(next.join("tasks.json"), r#"[{"id": 1}]"#).unwrap();
        let engine = std::sync::Arc::new(engine(&temp_dir));

        let session = engine.session().await;
        let switch = tokio::spawn({
            let engine = std::sync::Arc::clone(&engine);
            async move { engine.set_scenario("client_escalation").await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!switch.is_finished());

        let pinned = session.invoke("task.list", &Map::new()).await.unwrap();
        assert_eq!(pinned, json!({ "tasks": [] }));
        assert_eq!(session.scenario(), "inbox_triage");
        drop(session);

        assert_eq!(switch.await.unwrap().unwrap(), "client_escalation");
        assert!(engine.tool_calls().is_empty());

        let session = engine.session().await;
        let switched = session.invoke("task.list", &Map::new()).await.unwrap();
        assert_eq!(switched, json!({ "tasks": [{ "id": 1 }] }));
    }

    #[tokio::test]
    async fn request_log_keeps_failures() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir);
        let session = engine.session().await;
        session.record_request(RequestLogEntry::new("nope", Some(json!({})), 404)).await;
        assert_eq!(session.scenario(), "inbox_triage");
        drop(session);

        let requests = engine.all_requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].success);
    }
}
