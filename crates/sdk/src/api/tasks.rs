//! Tasks API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use crate::types::extract_list;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tasks API: executions of templates.
pub struct TasksApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> TasksApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    /// List all tasks of a project, in the order the service returns them.
    pub async fn list(&self, project_id: i64) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self
            .client
            .http
            .get(&format!("/api/project/{}/tasks", project_id))
            .await?;
        Ok(extract_list(response, "tasks"))
    }

    /// List the most recent tasks of a project (server-side capped).
    pub async fn last(&self, project_id: i64) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self
            .client
            .http
            .get(&format!("/api/project/{}/tasks/last", project_id))
            .await?;
        Ok(extract_list(response, "tasks"))
    }

    /// Get a specific task.
    pub async fn get(&self, project_id: i64, task_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!("/api/project/{}/tasks/{}", project_id, task_id))
            .await
    }

    /// Start a new task from a template.
    pub async fn run(&self, project_id: i64, request: &RunTaskRequest) -> SemaphoreResult<Value> {
        self.client
            .http
            .post(&format!("/api/project/{}/tasks", project_id), request)
            .await
    }

    /// Ask the service to stop a task.
    pub async fn stop(&self, project_id: i64, task_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .post_no_response(
                &format!("/api/project/{}/tasks/{}/stop", project_id, task_id),
                &serde_json::json!({}),
            )
            .await
    }

    /// Structured task output: one record per output line.
    pub async fn output(&self, project_id: i64, task_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!(
                "/api/project/{}/tasks/{}/output",
                project_id, task_id
            ))
            .await
    }

    /// Plain-text task output exactly as the runner produced it.
    pub async fn raw_output(&self, project_id: i64, task_id: i64) -> SemaphoreResult<String> {
        self.client
            .http
            .get_text(&format!(
                "/api/project/{}/tasks/{}/raw_output",
                project_id, task_id
            ))
            .await
    }
}

/// Request to start a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTaskRequest {
    pub template_id: i64,
    /// Extra variables, sent as a JSON-encoded object string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunTaskRequest {
    pub fn new(template_id: i64) -> Self {
        Self {
            template_id,
            ..Default::default()
        }
    }

    /// Attach environment variables; the service expects them JSON-encoded.
    pub fn with_environment(
        mut self,
        environment: &BTreeMap<String, String>,
    ) -> SemaphoreResult<Self> {
        self.environment = Some(serde_json::to_string(environment)?);
        Ok(self)
    }
}
