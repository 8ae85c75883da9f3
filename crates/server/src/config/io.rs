//! Configuration loading: defaults, then config file, then environment, then CLI flags.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use sandbox_engine::ToolCatalog;
use sandbox_util::expand_tilde;
use tracing::debug;

use crate::config::model::{ConfigError, ConfigLayer, SandboxConfig};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_PATH_ENV: &str = "MOCK_TOOLS_CONFIG";
pub const FIXTURES_PATH_ENV: &str = "FIXTURES_PATH";
pub const LOG_PATH_ENV: &str = "LOG_PATH";
pub const SCENARIO_ENV: &str = "SCENARIO";
pub const BIND_ADDRESS_ENV: &str = "MOCK_TOOLS_BIND";
pub const CATALOG_PATH_ENV: &str = "MOCK_TOOLS_CATALOG";

/// Config file path named by the environment, if any.
pub fn config_path_from_env() -> Option<PathBuf> {
    env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(|path| expand_tilde(&path))
}

/// Read a JSON config file. The file must exist once it has been named.
pub fn load_layer_from_path(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Values provided through environment variables.
pub fn env_layer() -> ConfigLayer {
    ConfigLayer {
        fixtures_path: env::var(FIXTURES_PATH_ENV).ok(),
        log_path: env::var(LOG_PATH_ENV).ok(),
        scenario: env::var(SCENARIO_ENV).ok(),
        bind_address: env::var(BIND_ADDRESS_ENV).ok(),
        catalog_path: env::var(CATALOG_PATH_ENV).ok(),
    }
}

/// Resolve the effective configuration.
///
/// `config_path` takes precedence over `MOCK_TOOLS_CONFIG`; `overrides` carries CLI flags.
pub fn resolve_config(config_path: Option<&Path>, overrides: &ConfigLayer) -> Result<SandboxConfig, ConfigError> {
    let mut config = SandboxConfig::default();

    if let Some(path) = config_path.map(Path::to_path_buf).or_else(config_path_from_env) {
        debug!("Loading config file: {}", path.display());
        config.apply(&load_layer_from_path(&path)?);
    }
    config.apply(&env_layer());
    config.apply(overrides);

    resolve_bind_address(&config.bind_address)?;
    Ok(config)
}

/// Catalog named by the configuration, or the built-in catalog.
pub fn load_catalog(config: &SandboxConfig) -> Result<ToolCatalog, ConfigError> {
    match &config.catalog_path {
        Some(path) => {
            debug!("Loading catalog override: {}", path.display());
            Ok(ToolCatalog::load_from_path(path)?)
        }
        None => Ok(ToolCatalog::builtin()),
    }
}

/// Parse a bind address such as `127.0.0.1:3001`.
pub fn resolve_bind_address(address: &str) -> Result<SocketAddr, ConfigError> {
    address.trim().parse().map_err(|error: std::net::AddrParseError| ConfigError::BindAddress {
        address: address.to_string(),
        message: error.to_string(),
    })
}
