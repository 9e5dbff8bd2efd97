//! Health API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use serde_json::Value;

/// Health API for checking reachability and credentials.
pub struct HealthApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    /// Unauthenticated liveness probe; Semaphore answers `pong`.
    pub async fn ping(&self) -> SemaphoreResult<String> {
        self.client.http.get_text("/api/ping").await
    }

    /// The user owning the configured token. Fails with an authentication
    /// error when the token is invalid or expired.
    pub async fn current_user(&self) -> SemaphoreResult<Value> {
        self.client.http.get("/api/user").await
    }
}
