//! Registry of named handler functions for `custom` catalog entries.
//!
//! Handlers are plain functions of the active scenario and the call arguments. They never
//! fail: I/O problems and malformed fixtures degrade to the handler's "no data" result.

use std::path::Path;

use indexmap::IndexMap;
use sandbox_util::{is_contained_relative_path, truncate_chars, value_to_text};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::field_aliases::{CHANNEL_ALIASES, INSTRUCTION_ALIASES, MESSAGE_ID_ALIASES, NOTE_PATH_ALIASES, QUERY_ALIASES, resolve_alias_text};
use crate::fixtures::FixtureStore;

/// Chat message fixture read by the channel-filtering handler.
pub const SLACK_MESSAGES_FIXTURE: &str = "slack_messages.json";
/// Canned search results read by the web search handler.
pub const WEB_SEARCH_FIXTURE: &str = "web_search_results.json";

const DRAFT_PREVIEW_MAX_CHARS: usize = 100;
const CHANNEL_MARKER: char = '#';

/// Scenario-scoped inputs available to a handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub scenario: &'a str,
    pub fixtures: &'a FixtureStore,
}

impl HandlerContext<'_> {
    /// Load a fixture, treating a malformed file as absent.
    fn load_fixture(&self, filename: &str) -> Option<Value> {
        match self.fixtures.load(self.scenario, filename) {
            Ok(value) => value,
            Err(error) => {
                warn!("Ignoring unreadable fixture for scenario {}: {}", self.scenario, error);
                None
            }
        }
    }
}

/// Signature shared by every custom handler.
pub type ToolHandler = fn(&HandlerContext<'_>, &Map<String, Value>) -> Value;

/// Handler functions keyed by the identifier catalog entries reference.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: IndexMap<String, ToolHandler>,
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the built-in handlers.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("email_draft", draft_reply);
        registry.register("memory_read", read_note);
        registry.register("slack_read_messages", read_channel_messages);
        registry.register("search_web", search_web);
        registry
    }

    /// Register or replace a handler.
    pub fn register(&mut self, name: impl Into<String>, handler: ToolHandler) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<ToolHandler> {
        self.handlers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered handler names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

/// Synthesize a deterministic reply draft for a message.
fn draft_reply(_context: &HandlerContext<'_>, args: &Map<String, Value>) -> Value {
    let message_id = resolve_alias_text(args, MESSAGE_ID_ALIASES, "unknown");
    let instructions = resolve_alias_text(args, INSTRUCTION_ALIASES, "No instructions provided");
    json!({
        "draft_id": format!("draft_{message_id}"),
        "preview": format!("[Draft reply to {message_id}]: {}...", truncate_chars(&instructions, DRAFT_PREVIEW_MAX_CHARS)),
    })
}

/// Read a note file from the scenario's notes directory.
fn read_note(context: &HandlerContext<'_>, args: &Map<String, Value>) -> Value {
    let requested = resolve_alias_text(args, NOTE_PATH_ALIASES, "");
    if requested.is_empty() || !is_contained_relative_path(Path::new(&requested)) {
        return json!({ "content": null, "exists": false });
    }

    let path = context.fixtures.note_path(context.scenario, &requested);
    match std::fs::read_to_string(&path) {
        Ok(content) => json!({ "content": content, "exists": true }),
        Err(_) => json!({ "content": null, "exists": false }),
    }
}

/// List chat messages, optionally restricted to one channel.
///
/// Channel ids match with or without a leading `#` on either side.
fn read_channel_messages(context: &HandlerContext<'_>, args: &Map<String, Value>) -> Value {
    let messages = match context.load_fixture(SLACK_MESSAGES_FIXTURE) {
        Some(Value::Array(messages)) => messages,
        _ => Vec::new(),
    };

    let channel = resolve_alias_text(args, CHANNEL_ALIASES, "");
    if channel.is_empty() {
        return json!({ "messages": messages });
    }

    let wanted = channel.trim_start_matches(CHANNEL_MARKER);
    let filtered: Vec<Value> = messages
        .into_iter()
        .filter(|message| {
            let channel_of = message.get("channel").map(value_to_text).unwrap_or_default();
            channel_of.trim_start_matches(CHANNEL_MARKER) == wanted
        })
        .collect();
    json!({ "messages": filtered })
}

/// Return canned search results, or a single placeholder hit for the query.
fn search_web(context: &HandlerContext<'_>, args: &Map<String, Value>) -> Value {
    let query = resolve_alias_text(args, QUERY_ALIASES, "");
    match context.load_fixture(WEB_SEARCH_FIXTURE) {
        Some(Value::Object(by_query)) if by_query.contains_key(&query) => {
            json!({ "results": by_query.get(&query).cloned().unwrap_or(Value::Null) })
        }
        Some(Value::Array(results)) if !results.is_empty() => json!({ "results": results }),
        _ => placeholder_search_result(&query),
    }
}

fn placeholder_search_result(query: &str) -> Value {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    json!({
        "results": [{
            "title": format!("Search result for: {query}"),
            "url": format!("https://example.com/search?q={encoded}"),
            "snippet": format!("Mock search result for '{query}'"),
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn scenario_dir(temp_dir: &TempDir) -> std::path::PathBuf {
        let dir = temp_dir.path().join("s");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn call(temp_dir: &TempDir, handler: &str, input: Value) -> Value {
        let store = FixtureStore::new(temp_dir.path());
        let context = HandlerContext {
            scenario: "s",
            fixtures: &store,
        };
        let handler = HandlerRegistry::builtin().get(handler).unwrap();
        handler(&context, &args(input))
    }

    #[test]
    fn builtin_registry_names() {
        let registry = HandlerRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["email_draft", "memory_read", "slack_read_messages", "search_web"]);
        assert!(!registry.contains("handle_email_draft"));
    }

    #[test]
    fn draft_reply_uses_aliases_and_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let long = "y".repeat(150);
        let result = call(&temp_dir, "email_draft", json!({ "emailId": "m1", "reply": long }));
        assert_eq!(result["draft_id"], "draft_m1");
        assert_eq!(result["preview"], format!("[Draft reply to m1]: {}...", "y".repeat(100)));
    }

    #[test]
    fn draft_reply_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let result = call(&temp_dir, "email_draft", json!({}));
        assert_eq!(result["draft_id"], "draft_unknown");
        assert_eq!(result["preview"], "[Draft reply to unknown]: No instructions provided...");
    }

    #[test]
    fn read_note_reports_existence() {
        let temp_dir = TempDir::new().unwrap();
        let notes = scenario_dir(&temp_dir).join("memory").join("people");
        std::fs::create_dir_all(&notes).unwrap();
        std::fs::write(notes.join("boss.md"), "Prefers short emails").unwrap();

        let found = call(&temp_dir, "memory_read", json!({ "key": "people/boss.md" }));
        assert_eq!(found, json!({ "content": "Prefers short emails", "exists": true }));

        let missing = call(&temp_dir, "memory_read", json!({ "path": "people/nobody.md" }));
        assert_eq!(missing, json!({ "content": null, "exists": false }));

        let escape = call(&temp_dir, "memory_read", json!({ "path": "../../secrets.txt" }));
        assert_eq!(escape["exists"], false);

        let directory = call(&temp_dir, "memory_read", json!({ "path": "people" }));
        assert_eq!(directory["exists"], false);
    }

    #[test]
    fn channel_filter_ignores_marker_prefix() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            scenario_dir(&temp_dir).join(SLACK_MESSAGES_FIXTURE),
            r##"[{"channel": "#eng", "text": "a"}, {"channel": "eng", "text": "b"}, {"channel": "ops", "text": "c"}]"##,
        )
        .unwrap();

        let with_marker = call(&temp_dir, "slack_read_messages", json!({ "channel": "#eng" }));
        let without_marker = call(&temp_dir, "slack_read_messages", json!({ "channelId": "eng" }));
        assert_eq!(with_marker, without_marker);
        assert_eq!(with_marker["messages"].as_array().unwrap().len(), 2);

        let unfiltered = call(&temp_dir, "slack_read_messages", json!({}));
        assert_eq!(unfiltered["messages"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn channel_messages_absent_or_malformed_fixture_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(call(&temp_dir, "slack_read_messages", json!({})), json!({ "messages": [] }));

        std::fs::write(scenario_dir(&temp_dir).join(SLACK_MESSAGES_FIXTURE), "{oops").unwrap();
        assert_eq!(call(&temp_dir, "slack_read_messages", json!({})), json!({ "messages": [] }));
    }

    #[test]
    fn search_prefers_keyed_results() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            scenario_dir(&temp_dir).join(WEB_SEARCH_FIXTURE),
            r#"{"rust async": [{"title": "Tokio"}]}"#,
        )
        .unwrap();

        let hit = call(&temp_dir, "search_web", json!({ "q": "rust async" }));
        assert_eq!(hit, json!({ "results": [{ "title": "Tokio" }] }));

        let miss = call(&temp_dir, "search_web", json!({ "query": "weather today" }));
        let results = miss["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["title"], "Search result for: weather today");
        assert_eq!(results[0]["url"], "https://example.com/search?q=weather+today");
        assert_eq!(results[0]["snippet"], "Mock search result for 'weather today'");
    }

    #[test]
    fn search_returns_plain_result_list_unfiltered() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(scenario_dir(&temp_dir).join(WEB_SEARCH_FIXTURE), r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        let result = call(&temp_dir, "search_web", json!({ "query": "anything" }));
        assert_eq!(result["results"].as_array().unwrap().len(), 2);
    }
}
