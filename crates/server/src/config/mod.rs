//! Server configuration.
//! Resolves fixture, log, scenario, bind, and catalog settings from defaults, an optional
//! JSON config file, the environment, and CLI flags, in that order.

mod io;
mod model;

pub use io::{
    BIND_ADDRESS_ENV, CATALOG_PATH_ENV, CONFIG_PATH_ENV, FIXTURES_PATH_ENV, LOG_PATH_ENV, SCENARIO_ENV, config_path_from_env, env_layer,
    load_catalog, load_layer_from_path, resolve_bind_address, resolve_config,
};
pub use model::{ConfigError, ConfigLayer, DEFAULT_BIND_ADDRESS, DEFAULT_FIXTURES_PATH, DEFAULT_LOG_PATH, DEFAULT_SCENARIO, SandboxConfig};
