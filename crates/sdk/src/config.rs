//! Configuration types for the Semaphore SDK.

use std::time::Duration;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Semaphore client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Semaphore server (without the `/api` suffix).
    pub base_url: Url,
    /// API token sent as a bearer credential.
    pub api_token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL rendered without a trailing slash, for building web UI links.
    pub fn web_base(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}
