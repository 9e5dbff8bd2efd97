//! Projects API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use crate::types::extract_list;
use serde_json::Value;

/// Projects API.
pub struct ProjectsApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> ProjectsApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    /// List all projects visible to the token.
    pub async fn list(&self) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self.client.http.get("/api/projects").await?;
        Ok(extract_list(response, "projects"))
    }

    /// Get a specific project.
    pub async fn get(&self, project_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!("/api/project/{}", project_id))
            .await
    }

    /// Create a project.
    pub async fn create(&self, project: &Value) -> SemaphoreResult<Value> {
        self.client.http.post("/api/projects", project).await
    }

    /// Replace a project. Semaphore expects the full object including `id`.
    pub async fn update(&self, project_id: i64, project: &Value) -> SemaphoreResult<Value> {
        self.client
            .http
            .put(&format!("/api/project/{}", project_id), project)
            .await
    }

    /// Delete a project.
    pub async fn delete(&self, project_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .delete_no_response(&format!("/api/project/{}", project_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_projects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Infra"},
                {"id": 2, "name": "Apps"}
            ])))
            .mount(&server)
            .await;

        let projects = test_client(&server.uri()).projects().list().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1]["name"], "Apps");
    }

    #[tokio::test]
    async fn test_get_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "Infra"})),
            )
            .mount(&server)
            .await;

        let project = test_client(&server.uri()).projects().get(42).await.unwrap();
        assert_eq!(project["id"], 42);
    }

    #[tokio::test]
    async fn test_create_project() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/projects"))
            .and(body_json(json!({"name": "New", "alert": false})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "New"})),
            )
            .mount(&server)
            .await;

        let created = test_client(&server.uri())
            .projects()
            .create(&json!({"name": "New", "alert": false}))
            .await
            .unwrap();
        assert_eq!(created["id"], 7);
    }

    #[tokio::test]
    async fn test_delete_project() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/project/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri()).projects().delete(7).await.unwrap();
    }
}
