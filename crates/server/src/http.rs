//! Mock tools HTTP server host.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use sandbox_engine::{Engine, HandlerRegistry};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{SandboxConfig, load_catalog, resolve_bind_address};
use crate::routes::router;

/// Host configuration for a mock tools server instance.
#[derive(Debug, Clone)]
pub struct SandboxServer {
    bind_address: SocketAddr,
    engine: Arc<Engine>,
}

impl SandboxServer {
    /// Create a server around an existing engine.
    pub fn new(bind_address: SocketAddr, engine: Arc<Engine>) -> Self {
        Self { bind_address, engine }
    }

    /// Build the engine described by `config`, failing fast on catalog problems.
    pub fn from_config(config: &SandboxConfig) -> Result<Self> {
        let bind_address = resolve_bind_address(&config.bind_address)?;
        let catalog = load_catalog(config)?;
        let engine = Engine::new(config.engine_settings(), catalog, HandlerRegistry::builtin()).context("invalid tool catalog")?;
        Ok(Self::new(bind_address, Arc::new(engine)))
    }

    /// Start the server and return a handle for runtime inspection and shutdown.
    pub async fn start(self) -> Result<RunningSandboxServer> {
        let cancellation_token = CancellationToken::new();
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("failed to bind {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;

        let scenario = self.engine.current_scenario().await;
        info!(
            "Mock tools server listening on {} (scenario {}, {} tools)",
            bound_address,
            scenario,
            self.engine.tool_count()
        );

        let app = router(Arc::clone(&self.engine));
        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                if let Err(error) = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await
                {
                    warn!("Mock tools server exited with error: {}", error);
                }
            }
        });

        Ok(RunningSandboxServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
        })
    }
}

/// Runtime handle for a running mock tools server.
#[derive(Debug)]
pub struct RunningSandboxServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningSandboxServer {
    /// Return the bound socket address for the running server.
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Base URL clients should target.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_address)
    }

    /// Stop the server and wait for in-flight requests to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("mock tools server task failed: {error}"))?;
        info!("Mock tools server stopped");
        Ok(())
    }
}
