//! # Sandbox Engine
//!
//! The sandbox engine serves deterministic tool responses from per-scenario fixture files.
//! A declarative catalog maps each tool name to one of four behaviors, and a single dispatcher
//! interprets every entry the same way.
//!
//! ## Key Features
//!
//! - **Catalog-driven dispatch**: `fixture_list`, `fixture_lookup`, `write_action`, and `custom`
//! - **Hot fixtures**: fixture files are re-read on every call
//! - **Scenario switching**: swap the active scenario at runtime; both logs are cleared atomically
//! - **Alias-tolerant arguments**: `message_id`, `messageId`, and `id` all reach the same field
//!
//! ## Usage
//!
//! ```rust
//! use sandbox_engine::{Engine, EngineSettings};
//! use serde_json::{Map, json};
//!
//! # tokio_test_runtime(async {
//! let temp_dir = tempfile::tempdir()?;
//! let engine = Engine::with_builtin_catalog(EngineSettings {
//!     fixtures_path: temp_dir.path().join("fixtures"),
//!     log_path: temp_dir.path().join("logs"),
//!     scenario: "inbox_triage".into(),
//! })?;
//!
//! let session = engine.session().await;
//! let result = session.invoke("task.list", &Map::new()).await?;
//! assert_eq!(result, json!({ "tasks": [] }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # })?;
//! # fn tokio_test_runtime<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`catalog`**: built-in tool table, file loading, and validation
//! - **`dispatch`**: behavior execution against a scenario
//! - **`handlers`**: registry of named custom handler functions
//! - **`fixtures`**: scenario-scoped fixture files
//! - **`scenario`**: the switchable active scenario
//! - **`logging`**: call and request logs with JSON-lines journals
//! - **`session`**: the [`Engine`] facade used by the HTTP layer

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod field_aliases;
pub mod fixtures;
pub mod handlers;
pub mod logging;
pub mod scenario;
pub mod session;
pub mod templates;
pub mod transforms;

pub use catalog::ToolCatalog;
pub use dispatch::ToolDispatcher;
pub use error::{CatalogError, DispatchError, EngineError, FixtureError, JournalError, ScenarioError};
pub use field_aliases::{resolve_alias, resolve_alias_text};
pub use fixtures::FixtureStore;
pub use handlers::{HandlerContext, HandlerRegistry, ToolHandler};
pub use logging::{CallLogger, JsonlJournal, RequestLogger, ScenarioLog};
pub use scenario::{ScenarioContext, validate_scenario_name};
pub use session::{Engine, EngineSettings, Session};
pub use templates::render_template;
