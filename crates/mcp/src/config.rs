// Server configuration: CLI flags, environment, .env and an optional TOML file

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use semaphore_sdk::{SemaphoreClient, SemaphoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:3000";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How MCP messages reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

/// Command-line arguments. Each flag falls back to its environment variable.
#[derive(Parser, Debug, Default)]
#[command(name = "semaphore-mcp")]
#[command(about = "MCP server for Semaphore UI", long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "semaphore-mcp.toml")]
    pub config: PathBuf,

    /// Semaphore base URL
    #[arg(long, env = "SEMAPHORE_URL")]
    pub url: Option<String>,

    /// Semaphore API token
    #[arg(long, env = "SEMAPHORE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SEMAPHORE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Transport to serve MCP on
    #[arg(long, env = "MCP_TRANSPORT", value_enum)]
    pub transport: Option<Transport>,

    /// Host to bind to (http transport)
    #[arg(long, env = "MCP_HOST")]
    pub host: Option<String>,

    /// Port to listen on (http transport)
    #[arg(short, long, env = "MCP_PORT")]
    pub port: Option<u16>,

    /// Log level; RUST_LOG takes precedence
    #[arg(long, env = "MCP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Skip the startup connectivity and token check
    #[arg(long)]
    pub skip_check: bool,
}

/// Optional TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub semaphore: SemaphoreSection,

    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemaphoreSection {
    pub url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub transport: Option<Transport>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Load the file if it exists; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub url: String,
    pub api_token: String,
    pub timeout: Duration,
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub skip_check: bool,
}

impl Settings {
    /// Resolve settings from arguments and the configuration file they name.
    ///
    /// Call after loading `.env` so its values are visible as environment
    /// variables.
    pub fn load(args: &Args) -> Result<Self> {
        let file = FileConfig::load(&args.config)?;
        Self::resolve(args, file)
    }

    /// Arguments (already merged with the environment by clap) win over the file.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let api_token = args
            .token
            .clone()
            .or(file.semaphore.api_token)
            .filter(|t| !t.trim().is_empty());
        let Some(api_token) = api_token else {
            bail!("SEMAPHORE_API_TOKEN is not set; pass --token or set it in the environment");
        };

        let timeout_secs = args
            .timeout_secs
            .or(file.semaphore.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("Timeout must be at least one second");
        }

        Ok(Self {
            url: args
                .url
                .clone()
                .or(file.semaphore.url)
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            transport: args.transport.or(file.server.transport).unwrap_or_default(),
            host: args
                .host
                .clone()
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            log_level: args
                .log_level
                .clone()
                .or(file.server.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            skip_check: args.skip_check,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the Semaphore client these settings describe.
    pub fn client(&self) -> SemaphoreResult<SemaphoreClient> {
        SemaphoreClient::builder()
            .base_url(&self.url)
            .api_token(&self.api_token)
            .timeout(self.timeout)
            .build()
    }
}
