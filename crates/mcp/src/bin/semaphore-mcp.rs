// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use semaphore_mcp::config::{Args, Settings, Transport, DEFAULT_LOG_LEVEL};
use semaphore_mcp::startup::verify_connection;
use semaphore_mcp::{semaphore_registry, McpServer};

#[tokio::main]
async fn main() -> Result<()> {
    // .env never overrides variables already set in the environment
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    let settings = Settings::load(&args);

    // Initialize tracing; stdout is reserved for the stdio transport
    let level = settings
        .as_ref()
        .map(|s| s.log_level.clone())
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{level},semaphore_mcp={level},semaphore_sdk={level}").into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Ok(path) = &dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Semaphore MCP server starting (Semaphore at {})", settings.url);

    let client = settings.client().context("Failed to create Semaphore client")?;

    if settings.skip_check {
        tracing::warn!("Skipping startup connectivity check");
    } else {
        match verify_connection(&client).await {
            Ok(user) => tracing::info!(%user, "Connected to Semaphore"),
            Err(e) => {
                tracing::error!("Startup check failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    let registry = semaphore_registry(client);
    tracing::info!("Registered {} tools", registry.len());
    let server = McpServer::new(registry);

    match settings.transport {
        Transport::Stdio => semaphore_mcp::transport::serve_stdio(server).await?,
        Transport::Http => semaphore_mcp::transport::serve_http(&settings.bind_addr(), server).await?,
    }

    Ok(())
}
