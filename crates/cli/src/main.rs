use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sandbox_api::MockToolsClient;
use sandbox_engine::HandlerRegistry;
use sandbox_server::SandboxServer;
use sandbox_server::config::{ConfigLayer, load_catalog, resolve_config};
use serde_json::Value;
use tracing::info;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";

/// Deterministic mock productivity tools for agent evaluation.
#[derive(Parser, Debug)]
#[command(name = "mock-tools", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the mock tools HTTP server until interrupted
    Serve(ServeArgs),
    /// Validate the configured catalog and print its tool directory
    Tools(ConfigArgs),
    /// Check a running server
    Health(ClientArgs),
    /// Switch a running server to another scenario, clearing its logs
    Reset {
        scenario: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Invoke a tool and print the raw response
    Call {
        tool: String,
        /// JSON object passed as the tool arguments
        #[arg(long, default_value = "{}")]
        args: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Print the successful call log, or every request with --all
    Calls {
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file (camelCase keys)
    #[arg(long, env = "MOCK_TOOLS_CONFIG")]
    config: Option<PathBuf>,
    /// Catalog override (YAML or JSON)
    #[arg(long)]
    catalog: Option<String>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Root directory holding one fixture directory per scenario
    #[arg(long)]
    fixtures: Option<String>,
    /// Directory for the JSON-lines call and request logs
    #[arg(long)]
    logs: Option<String>,
    /// Scenario active at startup
    #[arg(long)]
    scenario: Option<String>,
    /// Listen address, for example 127.0.0.1:3001
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// Base URL of a running server
    #[arg(long, env = "MOCK_TOOLS_URL", default_value = DEFAULT_SERVER_URL)]
    url: String,
    /// Seconds to wait for the server to report healthy
    #[arg(long, default_value_t = 0)]
    wait: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Tools(args) => print_directory(args),
        Command::Health(client) => {
            let client = connect(&client).await?;
            print_json(&client.health().await?)
        }
        Command::Reset { scenario, client } => {
            let client = connect(&client).await?;
            print_json(&client.set_scenario(&scenario).await?)
        }
        Command::Call { tool, args, client } => {
            let args: Value = serde_json::from_str(&args).context("--args must be valid JSON")?;
            let client = connect(&client).await?;
            println!("{}", client.call_tool(&tool, &args).await);
            Ok(())
        }
        Command::Calls { all, client } => {
            let client = connect(&client).await?;
            if all {
                print_json(&client.all_requests().await?)
            } else {
                print_json(&client.tool_calls().await?)
            }
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn serve(args: ServeArgs) -> Result<()> {
    let overrides = ConfigLayer {
        fixtures_path: args.fixtures,
        log_path: args.logs,
        scenario: args.scenario,
        bind_address: args.bind,
        catalog_path: args.config.catalog,
    };
    let config = resolve_config(args.config.config.as_deref(), &overrides)?;
    info!(
        "Serving fixtures from {} with logs in {}",
        config.fixtures_path.display(),
        config.log_path.display()
    );
    let server = SandboxServer::from_config(&config)?.start().await?;

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received, draining in-flight requests");
    server.stop().await
}

fn print_directory(args: ConfigArgs) -> Result<()> {
    let overrides = ConfigLayer {
        catalog_path: args.catalog,
        ..ConfigLayer::default()
    };
    let config = resolve_config(args.config.as_deref(), &overrides)?;
    let catalog = load_catalog(&config)?;
    catalog.validate(&HandlerRegistry::builtin())?;
    print_json(&catalog.directory())
}

async fn connect(args: &ClientArgs) -> Result<MockToolsClient> {
    let client = MockToolsClient::new(&args.url)?;
    if args.wait > 0 {
        client.wait_until_healthy(Duration::from_secs(args.wait)).await?;
    }
    Ok(client)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
