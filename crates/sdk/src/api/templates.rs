//! Templates API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use crate::types::extract_list;
use serde_json::Value;

/// Templates API for a project's job definitions.
pub struct TemplatesApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> TemplatesApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    /// List all templates of a project.
    pub async fn list(&self, project_id: i64) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self
            .client
            .http
            .get(&format!("/api/project/{}/templates", project_id))
            .await?;
        Ok(extract_list(response, "templates"))
    }

    /// Get a specific template.
    pub async fn get(&self, project_id: i64, template_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!(
                "/api/project/{}/templates/{}",
                project_id, template_id
            ))
            .await
    }

    /// Create a template.
    pub async fn create(&self, project_id: i64, template: &Value) -> SemaphoreResult<Value> {
        self.client
            .http
            .post(&format!("/api/project/{}/templates", project_id), template)
            .await
    }

    /// Replace a template.
    pub async fn update(
        &self,
        project_id: i64,
        template_id: i64,
        template: &Value,
    ) -> SemaphoreResult<Value> {
        self.client
            .http
            .put(
                &format!("/api/project/{}/templates/{}", project_id, template_id),
                template,
            )
            .await
    }

    /// Delete a template.
    pub async fn delete(&self, project_id: i64, template_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .delete_no_response(&format!(
                "/api/project/{}/templates/{}",
                project_id, template_id
            ))
            .await
    }

    /// Stop every running or queued task of a template.
    pub async fn stop_all_tasks(&self, project_id: i64, template_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .post_no_response(
                &format!(
                    "/api/project/{}/templates/{}/stop_all_tasks",
                    project_id, template_id
                ),
                &serde_json::json!({}),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_templates_wrapped_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "templates": [{"id": 1, "name": "Deploy", "project_id": 1}]
            })))
            .mount(&server)
            .await;

        let templates = test_client(&server.uri()).templates().list(1).await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0]["name"], "Deploy");
    }

    #[tokio::test]
    async fn test_get_template_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/templates/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .templates()
            .get(1, 99)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stop_all_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/project/1/templates/5/stop_all_tasks"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri())
            .templates()
            .stop_all_tasks(1, 5)
            .await
            .unwrap();
    }
}
