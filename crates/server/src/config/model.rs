//! Data models for server configuration.

use std::path::PathBuf;

use sandbox_engine::{CatalogError, EngineSettings};
use sandbox_util::expand_tilde;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FIXTURES_PATH: &str = "./fixtures";
pub const DEFAULT_LOG_PATH: &str = "./logs";
pub const DEFAULT_SCENARIO: &str = "inbox_triage";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Root containing one fixture directory per scenario.
    pub fixtures_path: PathBuf,
    /// Directory receiving the JSON-lines call and request journals.
    pub log_path: PathBuf,
    /// Scenario active at startup.
    pub scenario: String,
    /// Socket address the HTTP server listens on.
    pub bind_address: String,
    /// Catalog override; `None` serves the built-in catalog.
    pub catalog_path: Option<PathBuf>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            fixtures_path: PathBuf::from(DEFAULT_FIXTURES_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            scenario: DEFAULT_SCENARIO.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            catalog_path: None,
        }
    }
}

impl SandboxConfig {
    /// Overlay every value set in `layer`.
    pub fn apply(&mut self, layer: &ConfigLayer) {
        if let Some(path) = non_empty(&layer.fixtures_path) {
            self.fixtures_path = expand_tilde(path);
        }
        if let Some(path) = non_empty(&layer.log_path) {
            self.log_path = expand_tilde(path);
        }
        if let Some(scenario) = non_empty(&layer.scenario) {
            self.scenario = scenario.to_string();
        }
        if let Some(address) = non_empty(&layer.bind_address) {
            self.bind_address = address.to_string();
        }
        if let Some(path) = non_empty(&layer.catalog_path) {
            self.catalog_path = Some(expand_tilde(path));
        }
    }

    /// Engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fixtures_path: self.fixtures_path.clone(),
            log_path: self.log_path.clone(),
            scenario: self.scenario.clone(),
        }
    }
}

/// One partial configuration source: the config file, the environment, or CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigLayer {
    pub fixtures_path: Option<String>,
    pub log_path: Option<String>,
    pub scenario: Option<String>,
    pub bind_address: Option<String>,
    pub catalog_path: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {} - {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid config file: {} - {source}", path.display())]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("Invalid bind address '{address}': {message}")]
    BindAddress { address: String, message: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
