//! Environments API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use crate::types::extract_list;
use serde_json::Value;

/// Environments API: per-project variable sets.
pub struct EnvironmentsApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> EnvironmentsApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    /// List all environments of a project.
    pub async fn list(&self, project_id: i64) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self
            .client
            .http
            .get(&format!("/api/project/{}/environment", project_id))
            .await?;
        Ok(extract_list(response, "environments"))
    }

    /// Get a specific environment.
    pub async fn get(&self, project_id: i64, environment_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!(
                "/api/project/{}/environment/{}",
                project_id, environment_id
            ))
            .await
    }

    /// Create an environment.
    pub async fn create(&self, project_id: i64, environment: &Value) -> SemaphoreResult<Value> {
        self.client
            .http
            .post(
                &format!("/api/project/{}/environment", project_id),
                environment,
            )
            .await
    }

    /// Replace an environment.
    pub async fn update(
        &self,
        project_id: i64,
        environment_id: i64,
        environment: &Value,
    ) -> SemaphoreResult<Value> {
        self.client
            .http
            .put(
                &format!("/api/project/{}/environment/{}", project_id, environment_id),
                environment,
            )
            .await
    }

    /// Delete an environment.
    pub async fn delete(&self, project_id: i64, environment_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .delete_no_response(&format!(
                "/api/project/{}/environment/{}",
                project_id, environment_id
            ))
            .await
    }
}
