//! Process-wide binding of the active scenario.
//!
//! Dispatches hold a read guard for their whole lifetime (fixture read, behavior, log append),
//! and switching takes the write guard. A switch therefore waits for in-flight dispatches and
//! no dispatch can observe the old scenario once the switch has returned.

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::ScenarioError;

/// Shared, switchable scenario identifier.
#[derive(Debug)]
pub struct ScenarioContext {
    current: RwLock<String>,
}

impl ScenarioContext {
    /// Create a context bound to an initial scenario.
    pub fn new(initial: impl Into<String>) -> Result<Self, ScenarioError> {
        let initial = initial.into();
        validate_scenario_name(&initial)?;
        Ok(Self {
            current: RwLock::new(initial),
        })
    }

    /// Current scenario identifier.
    pub async fn get_current(&self) -> String {
        self.current.read().await.clone()
    }

    /// Pin the current scenario for the duration of the returned guard.
    pub async fn read(&self) -> RwLockReadGuard<'_, String> {
        self.current.read().await
    }

    /// Exclusive access for a switch; callers clear dependent state before dropping the guard.
    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, String> {
        self.current.write().await
    }
}

/// Checks that a scenario name can safely name a directory under the fixtures root.
pub fn validate_scenario_name(name: &str) -> Result<(), ScenarioError> {
    if name.trim().is_empty() {
        return Err(ScenarioError::invalid_name(name, "must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(ScenarioError::invalid_name(name, "must not contain path separators"));
    }
    if name == "." || name == ".." {
        return Err(ScenarioError::invalid_name(name, "must not be a relative directory marker"));
    }
    Ok(())
}
