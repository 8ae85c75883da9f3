//! Error types for fixture resolution, catalog loading, and tool dispatch.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a fixture that exists on disk.
///
/// A missing fixture is not an error; [`crate::FixtureStore::load`] reports it as `None`.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Fixture read failed: {} - {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Fixture is not valid JSON: {} - {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Errors returned by [`crate::ToolDispatcher::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {tool}. Known tools: {known_tools:?}")]
    UnknownTool { tool: String, known_tools: Vec<String> },

    #[error("Missing handler: {handler} (tool {tool})")]
    MissingHandler { tool: String, handler: String },

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Errors raised while loading or validating a tool catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {} - {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse catalog file: {} - {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Tool '{tool}' references unregistered handler '{handler}'")]
    UnregisteredHandler { tool: String, handler: String },

    #[error("Tool '{tool}' is invalid: {reason}")]
    InvalidEntry { tool: String, reason: String },

    #[error("Catalog defines no tools")]
    Empty,
}

/// Errors raised when a scenario identifier cannot name a fixture directory.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Invalid scenario name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Errors raised while appending to a durable log file.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while constructing an [`crate::Engine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

impl DispatchError {
    /// Create an unknown tool error listing every known tool name.
    pub fn unknown_tool(tool: impl Into<String>, known_tools: Vec<String>) -> Self {
        Self::UnknownTool {
            tool: tool.into(),
            known_tools,
        }
    }

    /// Create a missing handler error.
    pub fn missing_handler(tool: impl Into<String>, handler: impl Into<String>) -> Self {
        Self::MissingHandler {
            tool: tool.into(),
            handler: handler.into(),
        }
    }
}

impl CatalogError {
    /// Create an invalid entry error.
    pub fn invalid_entry(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

impl ScenarioError {
    /// Create an invalid scenario name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
