//! Inventory API endpoints.

use crate::client::SemaphoreClient;
use crate::error::SemaphoreResult;
use crate::types::extract_list;
use serde_json::Value;

/// Inventory API: host lists a template runs against.
pub struct InventoryApi<'a> {
    client: &'a SemaphoreClient,
}

impl<'a> InventoryApi<'a> {
    pub(crate) fn new(client: &'a SemaphoreClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, project_id: i64) -> SemaphoreResult<Vec<Value>> {
        let response: Value = self
            .client
            .http
            .get(&format!("/api/project/{}/inventory", project_id))
            .await?;
        Ok(extract_list(response, "inventory"))
    }

    pub async fn get(&self, project_id: i64, inventory_id: i64) -> SemaphoreResult<Value> {
        self.client
            .http
            .get(&format!(
                "/api/project/{}/inventory/{}",
                project_id, inventory_id
            ))
            .await
    }

    pub async fn create(&self, project_id: i64, inventory: &Value) -> SemaphoreResult<Value> {
        self.client
            .http
            .post(&format!("/api/project/{}/inventory", project_id), inventory)
            .await
    }

    pub async fn update(
        &self,
        project_id: i64,
        inventory_id: i64,
        inventory: &Value,
    ) -> SemaphoreResult<Value> {
        self.client
            .http
            .put(
                &format!("/api/project/{}/inventory/{}", project_id, inventory_id),
                inventory,
            )
            .await
    }

    pub async fn delete(&self, project_id: i64, inventory_id: i64) -> SemaphoreResult<()> {
        self.client
            .http
            .delete_no_response(&format!(
                "/api/project/{}/inventory/{}",
                project_id, inventory_id
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
    async fn test_list_inventory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/2/inventory"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Web", "type": "static", "inventory": "[web]\nweb1"}
            ])))
            .mount(&server)
            .await;

        let items = test_client(&server.uri()).inventory().list(2).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["type"], "static");
    }
}
