//! Declarative tool catalog model shared by the engine, server, and CLI.
//!
//! A catalog maps tool names to exactly one [`ToolBehavior`]. The variants carry only the
//! fields their behavior kind needs, so a `write_action` entry cannot accidentally name a
//! fixture and a `fixture_lookup` entry cannot forget its lookup parameter. Entries keep
//! authoring order (via `IndexMap`) so directory listings and error payloads are stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered catalog document: tool name to behavior descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogDocument {
    /// Tool entries keyed by tool name, preserving author order.
    #[serde(default)]
    pub tools: IndexMap<String, ToolBehavior>,
}

/// Behavior descriptor for a single catalog entry, tagged by `behavior`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "behavior", rename_all = "snake_case")]
pub enum ToolBehavior {
    /// Return every record of a scenario fixture, wrapped under a response key.
    FixtureList(FixtureListSpec),
    /// Return the first fixture record whose lookup field matches an argument.
    FixtureLookup(FixtureLookupSpec),
    /// Acknowledge a simulated side effect with a templated response.
    WriteAction(WriteActionSpec),
    /// Delegate to a registered handler function.
    Custom(CustomSpec),
}

/// Parameters for [`ToolBehavior::FixtureList`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureListSpec {
    /// Fixture filename inside the scenario directory.
    pub fixture: String,
    /// Key the resulting sequence is wrapped under.
    pub response_key: String,
    /// Optional per-record transform applied before wrapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<RecordTransform>,
}

/// Parameters for [`ToolBehavior::FixtureLookup`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureLookupSpec {
    /// Fixture filename inside the scenario directory.
    pub fixture: String,
    /// Record field compared against the lookup value.
    #[serde(default = "default_lookup_field")]
    pub lookup_field: String,
    /// Primary argument name carrying the lookup value; `id` is always tried next.
    pub param_field: String,
    /// Key the matching record (or null) is returned under.
    pub response_key: String,
}

/// Parameters for [`ToolBehavior::WriteAction`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteActionSpec {
    /// Response template; top-level string values may contain `{ts}` or `{arg}` placeholders.
    #[serde(default = "default_write_response")]
    pub default_response: Map<String, Value>,
    /// Input fields copied verbatim into the response when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub echo_fields: Vec<String>,
    /// Advisory marker for tools that simulate a side effect with no undo.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub irreversible: bool,
}

/// Parameters for [`ToolBehavior::Custom`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomSpec {
    /// Registered handler identifier.
    pub handler: String,
}

/// Named per-record transforms available to `fixture_list` entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordTransform {
    /// Reduce an inbox message to a fixed summary shape with a short body snippet.
    InboxSummary,
}

/// Behavior kind without its parameters, used for directory listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    FixtureList,
    FixtureLookup,
    WriteAction,
    Custom,
}

impl BehaviorKind {
    /// Wire name of the behavior kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::FixtureList => "fixture_list",
            BehaviorKind::FixtureLookup => "fixture_lookup",
            BehaviorKind::WriteAction => "write_action",
            BehaviorKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToolBehavior {
    /// Behavior kind of this entry.
    pub fn kind(&self) -> BehaviorKind {
        match self {
            ToolBehavior::FixtureList(_) => BehaviorKind::FixtureList,
            ToolBehavior::FixtureLookup(_) => BehaviorKind::FixtureLookup,
            ToolBehavior::WriteAction(_) => BehaviorKind::WriteAction,
            ToolBehavior::Custom(_) => BehaviorKind::Custom,
        }
    }

    /// Fixture filename consulted by this entry, if any.
    pub fn fixture(&self) -> Option<&str> {
        match self {
            ToolBehavior::FixtureList(spec) => Some(spec.fixture.as_str()),
            ToolBehavior::FixtureLookup(spec) => Some(spec.fixture.as_str()),
            ToolBehavior::WriteAction(_) | ToolBehavior::Custom(_) => None,
        }
    }

    /// Whether the entry is flagged irreversible. Only write actions carry the flag.
    pub fn irreversible(&self) -> bool {
        matches!(self, ToolBehavior::WriteAction(spec) if spec.irreversible)
    }
}

/// Row of the `GET /tools` directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDirectoryEntry {
    pub name: String,
    pub behavior: BehaviorKind,
    pub irreversible: bool,
    pub fixture: Option<String>,
}

impl ToolDirectoryEntry {
    /// Build a directory row from a catalog entry.
    pub fn from_behavior(name: &str, behavior: &ToolBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior: behavior.kind(),
            irreversible: behavior.irreversible(),
            fixture: behavior.fixture().map(str::to_string),
        }
    }
}

/// Payload of `GET /tools`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDirectory {
    pub tools: Vec<ToolDirectoryEntry>,
    pub count: usize,
}

fn default_lookup_field() -> String {
    "id".to_string()
}

fn default_write_response() -> Map<String, Value> {
    let mut response = Map::new();
    response.insert("success".to_string(), Value::Bool(true));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_tagged_entries_in_author_order() {
        let yaml = r#"
tools:
  inbox.list:
    behavior: fixture_list
    fixture: inbox.json
    response_key: messages
    transform: inbox_summary
  email.read:
    behavior: fixture_lookup
    fixture: inbox.json
    param_field: message_id
    response_key: email
  email.send:
    behavior: write_action
    default_response:
      status: sent
    echo_fields: [draft_id]
    irreversible: true
  search.web:
    behavior: custom
    handler: search_web
"#;
        let document: CatalogDocument = serde_yaml::from_str(yaml).expect("catalog parses");
        let names: Vec<&str> = document.tools.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["inbox.list", "email.read", "email.send", "search.web"]);

        match &document.tools["email.read"] {
            ToolBehavior::FixtureLookup(spec) => {
                assert_eq!(spec.lookup_field, "id");
                assert_eq!(spec.param_field, "message_id");
            }
            other => panic!("unexpected behavior: {other:?}"),
        }
        assert!(document.tools["email.send"].irreversible());
        assert_eq!(document.tools["inbox.list"].fixture(), Some("inbox.json"));
        assert_eq!(document.tools["search.web"].kind(), BehaviorKind::Custom);
    }

    #[test]
    fn write_action_defaults_to_success_template() {
        let behavior: ToolBehavior = serde_json::from_value(json!({ "behavior": "write_action" })).expect("parses");
        let ToolBehavior::WriteAction(spec) = behavior else {
            panic!("expected write action");
        };
        assert_eq!(Value::Object(spec.default_response), json!({ "success": true }));
        assert!(spec.echo_fields.is_empty());
        assert!(!spec.irreversible);
    }

    #[test]
    fn lookup_requires_param_field() {
        let result = serde_json::from_value::<ToolBehavior>(json!({
            "behavior": "fixture_lookup",
            "fixture": "tasks.json",
            "response_key": "task"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn directory_entry_reports_fixture_and_flag() {
        let behavior = ToolBehavior::Custom(CustomSpec {
            handler: "memory_read".into(),
        });
        let entry = ToolDirectoryEntry::from_behavior("memory.read", &behavior);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "name": "memory.read", "behavior": "custom", "irreversible": false, "fixture": null })
        );
    }
}
