//! Scenario-scoped fixture resolution.
//!
//! Fixtures live at `<root>/<scenario>/<filename>` and are re-read on every call, so edits
//! made while the server is running are visible to the next dispatch.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::FixtureError;

/// Subdirectory of a scenario holding free-form note files.
const NOTES_DIRECTORY: &str = "memory";

/// File-backed, read-only fixture store rooted at a fixtures directory.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory containing one subdirectory per scenario.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a fixture file for a scenario.
    pub fn fixture_path(&self, scenario: &str, filename: &str) -> PathBuf {
        self.root.join(scenario).join(filename)
    }

    /// Path of a note file inside the scenario's notes directory.
    pub fn note_path(&self, scenario: &str, relative_path: &str) -> PathBuf {
        self.root.join(scenario).join(NOTES_DIRECTORY).join(relative_path)
    }

    /// Load and parse a fixture.
    ///
    /// Returns `Ok(None)` when the file does not exist. Read failures on an existing file and
    /// malformed JSON are errors.
    pub fn load(&self, scenario: &str, filename: &str) -> Result<Option<Value>, FixtureError> {
        let path = self.fixture_path(scenario, filename);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FixtureError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| FixtureError::Parse { path, source })
    }

    /// Load a fixture expected to hold a sequence of records.
    ///
    /// Absent fixtures yield an empty sequence; a fixture that is not an array yields no records.
    pub fn load_records(&self, scenario: &str, filename: &str) -> Result<Vec<Value>, FixtureError> {
        Ok(match self.load(scenario, filename)? {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with(scenario: &str, filename: &str, content: &str) -> (TempDir, FixtureStore) {
        let temp_dir = TempDir::new().unwrap();
        let scenario_dir = temp_dir.path().join(scenario);
        std::fs::create_dir_all(&scenario_dir).unwrap();
        std::fs::write(scenario_dir.join(filename), content).unwrap();
        let store = FixtureStore::new(temp_dir.path());
        (temp_dir, store)
    }

    #[test]
    fn missing_fixture_is_absent_not_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixtureStore::new(temp_dir.path());
        assert!(store.load("inbox_triage", "inbox.json").unwrap().is_none());
        assert!(store.load_records("inbox_triage", "inbox.json").unwrap().is_empty());
    }

    #[test]
    fn loads_parsed_json() {
        let (_guard, store) = store_with("inbox_triage", "inbox.json", r#"[{"id": "42"}]"#);
        assert_eq!(store.load("inbox_triage", "inbox.json").unwrap(), Some(json!([{ "id": "42" }])));
    }

    #[test]
    fn malformed_fixture_is_parse_error() {
        let (_guard, store) = store_with("inbox_triage", "inbox.json", "[{not json");
        let err = store.load("inbox_triage", "inbox.json").unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }

    #[test]
    fn edits_are_visible_on_next_load() {
        let (guard, store) = store_with("s", "tasks.json", r#"[{"id": 1}]"#);
        assert_eq!(store.load_records("s", "tasks.json").unwrap().len(), 1);
        std::fs::write(guard.path().join("s").join("tasks.json"), r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(store.load_records("s", "tasks.json").unwrap().len(), 2);
    }

    #[test]
    fn non_array_fixture_has_no_records() {
        let (_guard, store) = store_with("s", "tasks.json", r#"{"id": 1}"#);
        assert!(store.load_records("s", "tasks.json").unwrap().is_empty());
    }
}
