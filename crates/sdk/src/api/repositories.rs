//! Repositories API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use crate::types::extract_list;
use serde_json::Value;

/// Repositories API: git sources holding playbooks.
pub struct RepositoriesApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> RepositoriesApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    /// List all repositories of a project.
    pub async fn list(&self, project_id: i64) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self
            .client
            .http
            .get(&format!("/api/project/{}/repositories", project_id))
            .await?;
        Ok(extract_list(response, "repositories"))
    }

    /// Get a specific repository.
    pub async fn get(&self, project_id: i64, repository_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!(
                "/api/project/{}/repositories/{}",
                project_id, repository_id
            ))
            .await
    }

    /// Create a repository.
    pub async fn create(&self, project_id: i64, repository: &Value) -> SemaphoreResult<Value> {
        self.client
            .http
            .post(
                &format!("/api/project/{}/repositories", project_id),
                repository,
            )
            .await
    }

    /// Replace a repository.
    pub async fn update(
        &self,
        project_id: i64,
        repository_id: i64,
        repository: &Value,
    ) -> SemaphoreResult<Value> {
        self.client
            .http
            .put(
                &format!("/api/project/{}/repositories/{}", project_id, repository_id),
                repository,
            )
            .await
    }

    /// Delete a repository.
    pub async fn delete(&self, project_id: i64, repository_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .delete_no_response(&format!(
                "/api/project/{}/repositories/{}",
                project_id, repository_id
            ))
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
    async fn test_get_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/repositories/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 4,
                "name": "Demo",
                "git_url": "https://github.com/semaphoreui/semaphore-demo.git",
                "git_branch": "main",
                "ssh_key_id": 1
            })))
            .mount(&server)
            .await;

        let repo = test_client(&server.uri())
            .repositories()
            .get(1, 4)
            .await
            .unwrap();
        assert_eq!(repo["git_branch"], "main");
    }
}
