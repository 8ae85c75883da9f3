//! Tool catalog: the built-in table, file loading, and load-time validation.

use std::path::Path;

use indexmap::IndexMap;
use sandbox_types::{
    CatalogDocument, CustomSpec, FixtureListSpec, FixtureLookupSpec, RecordTransform, ToolBehavior, ToolDirectory, ToolDirectoryEntry,
    WriteActionSpec,
};
use sandbox_util::is_contained_relative_path;
use serde_json::{Map, Value, json};

use crate::error::CatalogError;
use crate::handlers::HandlerRegistry;

/// Ordered mapping from tool name to behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    tools: IndexMap<String, ToolBehavior>,
}

impl ToolCatalog {
    pub fn new(tools: IndexMap<String, ToolBehavior>) -> Self {
        Self { tools }
    }

    /// The catalog served when no override file is configured.
    pub fn builtin() -> Self {
        let tools = [
            // Email and inbox
            ("inbox.list", fixture_list("inbox.json", "messages", Some(RecordTransform::InboxSummary))),
            ("email.read", fixture_lookup("inbox.json", "message_id", "email")),
            ("email.draft", custom("email_draft")),
            ("email.send", write_action(json!({ "status": "sent" }), &["draft_id"], true)),
            ("email.archive", write_action(json!({ "status": "archived" }), &["message_id"], false)),
            // Calendar
            ("calendar.read", fixture_list("calendar.json", "events", None)),
            (
                "calendar.create",
                write_action(json!({ "status": "created", "event_id": "evt_{ts}" }), &["title", "start", "end"], true),
            ),
            (
                "calendar.update",
                write_action(json!({ "status": "updated" }), &["event_id", "title", "start", "end"], false),
            ),
            ("calendar.delete", write_action(json!({ "status": "deleted" }), &["event_id"], true)),
            // Messaging
            ("slack.list_channels", fixture_list("slack_channels.json", "channels", None)),
            ("slack.read_messages", custom("slack_read_messages")),
            (
                "slack.post_message",
                write_action(json!({ "status": "posted", "message_id": "slack_msg_{ts}" }), &["channel", "text"], true),
            ),
            (
                "slack.send_dm",
                write_action(json!({ "status": "sent", "message_id": "dm_{ts}" }), &["user", "text"], true),
            ),
            // Tasks
            ("task.list", fixture_list("tasks.json", "tasks", None)),
            ("task.get", fixture_lookup("tasks.json", "task_id", "task")),
            (
                "task.create",
                write_action(
                    json!({ "status": "created", "task_id": "task_{ts}" }),
                    &["title", "description", "assignee", "priority"],
                    false,
                ),
            ),
            (
                "task.update",
                write_action(json!({ "status": "updated" }), &["task_id", "status", "priority"], false),
            ),
            // Documents
            ("doc.list", fixture_list("documents.json", "documents", None)),
            ("doc.read", fixture_lookup("documents.json", "document_id", "document")),
            (
                "doc.create",
                write_action(json!({ "status": "created", "document_id": "doc_{ts}" }), &["title", "content"], false),
            ),
            // Contacts
            ("contacts.list", fixture_list("contacts.json", "contacts", None)),
            ("contacts.get", fixture_lookup("contacts.json", "contact_id", "contact")),
            // Notes
            ("memory.read", custom("memory_read")),
            ("memory.write", write_action(json!({ "success": true }), &["path"], false)),
            // Web search
            ("search.web", custom("search_web")),
        ];

        Self::new(tools.into_iter().map(|(name, behavior)| (name.to_string(), behavior)).collect())
    }

    /// Load a catalog document from disk.
    ///
    /// `.json` files are parsed as JSON; anything else as YAML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let parsed: Result<CatalogDocument, String> = if is_json {
            serde_json::from_str(&content).map_err(|error| error.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|error| error.to_string())
        };
        let document = parsed.map_err(|message| CatalogError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        if document.tools.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::new(document.tools))
    }

    /// Check every entry is usable before serving any traffic.
    pub fn validate(&self, handlers: &HandlerRegistry) -> Result<(), CatalogError> {
        if self.tools.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (name, behavior) in &self.tools {
            if name.trim().is_empty() {
                return Err(CatalogError::invalid_entry(name, "tool name must not be empty"));
            }
            validate_entry(name, behavior, handlers)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolBehavior> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolBehavior)> {
        self.tools.iter().map(|(name, behavior)| (name.as_str(), behavior))
    }

    /// Tool names in lexical order, as reported in unknown-tool errors.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Directory listing in catalog order.
    pub fn directory(&self) -> ToolDirectory {
        let tools: Vec<ToolDirectoryEntry> = self
            .iter()
            .map(|(name, behavior)| ToolDirectoryEntry::from_behavior(name, behavior))
            .collect();
        ToolDirectory { count: tools.len(), tools }
    }
}

fn validate_entry(name: &str, behavior: &ToolBehavior, handlers: &HandlerRegistry) -> Result<(), CatalogError> {
    let require = |value: &str, field: &str| {
        if value.trim().is_empty() {
            Err(CatalogError::invalid_entry(name, format!("{field} must not be empty")))
        } else {
            Ok(())
        }
    };

    match behavior {
        ToolBehavior::FixtureList(spec) => {
            require(&spec.fixture, "fixture")?;
            require(&spec.response_key, "response_key")?;
        }
        ToolBehavior::FixtureLookup(spec) => {
            require(&spec.fixture, "fixture")?;
            require(&spec.lookup_field, "lookup_field")?;
            require(&spec.param_field, "param_field")?;
            require(&spec.response_key, "response_key")?;
        }
        ToolBehavior::WriteAction(spec) => {
            for field in &spec.echo_fields {
                require(field, "echo_fields entry")?;
            }
        }
        ToolBehavior::Custom(spec) => {
            require(&spec.handler, "handler")?;
            if !handlers.contains(&spec.handler) {
                return Err(CatalogError::UnregisteredHandler {
                    tool: name.to_string(),
                    handler: spec.handler.clone(),
                });
            }
        }
    }

    if let Some(fixture) = behavior.fixture()
        && !is_contained_relative_path(Path::new(fixture))
    {
        return Err(CatalogError::invalid_entry(name, format!("fixture '{fixture}' must be a relative path inside the scenario")));
    }
    Ok(())
}

fn fixture_list(fixture: &str, response_key: &str, transform: Option<RecordTransform>) -> ToolBehavior {
    ToolBehavior::FixtureList(FixtureListSpec {
        fixture: fixture.to_string(),
        response_key: response_key.to_string(),
        transform,
    })
}

fn fixture_lookup(fixture: &str, param_field: &str, response_key: &str) -> ToolBehavior {
    ToolBehavior::FixtureLookup(FixtureLookupSpec {
        fixture: fixture.to_string(),
        lookup_field: "id".to_string(),
        param_field: param_field.to_string(),
        response_key: response_key.to_string(),
    })
}

fn write_action(template: Value, echo_fields: &[&str], irreversible: bool) -> ToolBehavior {
    let default_response = match template {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    ToolBehavior::WriteAction(WriteActionSpec {
        default_response,
        echo_fields: echo_fields.iter().map(|field| field.to_string()).collect(),
        irreversible,
    })
}

fn custom(handler: &str) -> ToolBehavior {
    ToolBehavior::Custom(CustomSpec {
        handler: handler.to_string(),
    })
}
