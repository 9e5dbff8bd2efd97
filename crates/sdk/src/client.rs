//! Main client for the Semaphore SDK.

use crate::api::*;
use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::{SemaphoreError, SemaphoreResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Semaphore UI REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SemaphoreClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl SemaphoreClient {
    /// Create a new client builder.
    pub fn builder() -> SemaphoreClientBuilder {
        SemaphoreClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> SemaphoreResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the health API.
    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }

    /// Get the projects API.
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }

    /// Get the templates API.
    pub fn templates(&self) -> TemplatesApi<'_> {
        TemplatesApi::new(self)
    }

    /// Get the tasks API.
    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(self)
    }

    /// Get the environments API.
    pub fn environments(&self) -> EnvironmentsApi<'_> {
        EnvironmentsApi::new(self)
    }

    /// Get the inventory API.
    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    /// Get the repositories API.
    pub fn repositories(&self) -> RepositoriesApi<'_> {
        RepositoriesApi::new(self)
    }

    /// Web UI link to a task's detail page.
    pub fn task_url(&self, project_id: i64, task_id: i64) -> String {
        format!(
            "{}/project/{}/history?t={}",
            self.config.web_base(),
            project_id,
            task_id
        )
    }

    /// Web UI link to a project's task history.
    pub fn project_tasks_url(&self, project_id: i64) -> String {
        format!("{}/project/{}/history", self.config.web_base(), project_id)
    }
}

/// Builder for creating a SemaphoreClient.
pub struct SemaphoreClientBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    timeout: Duration,
}

impl SemaphoreClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL of the Semaphore server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API token for authentication.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> SemaphoreResult<SemaphoreClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| SemaphoreError::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SemaphoreError::Config(format!(
                "base_url must be http or https, got {}",
                base_url.scheme()
            )));
        }

        let config = ClientConfig {
            base_url,
            api_token: self.api_token.filter(|t| !t.trim().is_empty()),
            timeout: self.timeout,
        };

        SemaphoreClient::from_config(config)
    }
}

impl Default for SemaphoreClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn test_client(base_url: &str) -> SemaphoreClient {
    SemaphoreClient::builder()
        .base_url(base_url)
        .api_token("test-token")
        .build()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let err = SemaphoreClient::builder().build().unwrap_err();
        assert!(matches!(err, SemaphoreError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let err = SemaphoreClient::builder()
            .base_url("ftp://semaphore.local")
            .build()
            .unwrap_err();
        assert!(matches!(err, SemaphoreError::Config(_)));
    }

    #[test]
    fn test_builder_drops_blank_token() {
        let client = SemaphoreClient::builder()
            .base_url("http://localhost:3000")
            .api_token("  ")
            .build()
            .unwrap();
        assert!(client.config().api_token.is_none());
    }

    #[test]
    fn test_web_urls() {
        let client = test_client("http://localhost:3000/");
        assert_eq!(
            client.task_url(1, 42),
            "http://localhost:3000/project/1/history?t=42"
        );
        assert_eq!(
            client.project_tasks_url(1),
            "http://localhost:3000/project/1/history"
        );
    }
}
