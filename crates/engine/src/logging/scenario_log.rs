//! In-memory log sequence mirrored to a per-scenario journal file.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use super::journal::JsonlJournal;

/// Journal file suffix for successful dispatches.
pub const CALLS_SUFFIX: &str = "_calls.jsonl";
/// Journal file suffix for every inbound attempt.
pub const ALL_REQUESTS_SUFFIX: &str = "_all_requests.jsonl";

/// Append-only sequence of log entries, cleared only on scenario switch.
#[derive(Debug)]
pub struct ScenarioLog<T> {
    entries: Mutex<Vec<T>>,
    journal: JsonlJournal,
    suffix: &'static str,
}

impl<T: Clone + Serialize> ScenarioLog<T> {
    pub fn new(journal: JsonlJournal, suffix: &'static str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            journal,
            suffix,
        }
    }

    /// Journal file name for a scenario.
    pub fn file_name(&self, scenario: &str) -> String {
        format!("{scenario}{}", self.suffix)
    }

    /// Record an entry in memory and append it to the scenario's journal.
    ///
    /// Journal failures are reported and otherwise ignored.
    pub async fn record(&self, scenario: &str, entry: T) {
        let file_name = self.file_name(scenario);
        if let Err(error) = self.journal.append(&file_name, &entry).await {
            warn!("Failed to append to {}: {}", self.journal.directory().join(&file_name).display(), error);
        }
        self.lock().push(entry);
    }

    /// Copy of every entry recorded since the last clear.
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// Drop every in-memory entry and return how many there were. Journal files are left untouched.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let dropped = entries.len();
        entries.clear();
        dropped
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
