// Environment and inventory tools
//
// Semaphore stores environment variables as a JSON-encoded string in the
// `json` field. Tools accept and return them as a plain object (`env_data`).

use crate::error::{ApiResultExt, ToolError, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    apply_updates, json_schema_integer, json_schema_object, json_schema_string,
    json_schema_value_map, parse_args, Tool, ToolTier,
};
use semaphore_sdk::SemaphoreClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Add a decoded `env_data` object next to the service's `json` string.
fn with_env_data(mut environment: Value) -> Value {
    let decoded = environment
        .get("json")
        .and_then(Value::as_str)
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => Some(value),
            Ok(_) | Err(_) => {
                tracing::debug!("Environment json field is not an object, leaving env_data empty");
                None
            }
        })
        .unwrap_or_else(|| Value::Object(Map::new()));

    if let Value::Object(fields) = &mut environment {
        fields.insert("env_data".to_string(), decoded);
    }
    environment
}

fn encode_env_data(tool: &str, env_data: &Map<String, Value>) -> ToolResult<String> {
    serde_json::to_string(env_data).map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ProjectArgs {
    project_id: i64,
}

#[derive(Debug, Deserialize)]
struct EnvironmentArgs {
    project_id: i64,
    environment_id: i64,
}

#[derive(Debug, Deserialize)]
struct InventoryArgs {
    project_id: i64,
    inventory_id: i64,
}

fn project_schema() -> Value {
    json_schema_object(
        json!({"project_id": json_schema_integer("ID of the project")}),
        vec!["project_id"],
    )
}

fn environment_schema(doc: &str) -> Value {
    json_schema_object(
        json!({
            "project_id": json_schema_integer("ID of the project"),
            "environment_id": json_schema_integer(doc)
        }),
        vec!["project_id", "environment_id"],
    )
}

fn inventory_schema(doc: &str) -> Value {
    json_schema_object(
        json!({
            "project_id": json_schema_integer("ID of the project"),
            "inventory_id": json_schema_integer(doc)
        }),
        vec!["project_id", "inventory_id"],
    )
}

/// Tool to list environments of a project
pub struct ListEnvironmentsTool {
    client: SemaphoreClient,
}

impl ListEnvironmentsTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListEnvironmentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "list_environments",
            "List all environments of a project",
            project_schema(),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectArgs = parse_args("list_environments", arguments)?;
        let environments = self
            .client
            .environments()
            .list(args.project_id)
            .await
            .during(format!("listing environments for project {}", args.project_id))?;
        let environments = environments.into_iter().map(with_env_data).collect();
        Ok(CallToolResult::json(&Value::Array(environments)))
    }
}

/// Tool to get a single environment
pub struct GetEnvironmentTool {
    client: SemaphoreClient,
}

impl GetEnvironmentTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_environment",
            "Get an environment with its variables decoded into env_data",
            environment_schema("ID of the environment to fetch"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: EnvironmentArgs = parse_args("get_environment", arguments)?;
        let environment = self
            .client
            .environments()
            .get(args.project_id, args.environment_id)
            .await
            .during(format!("getting environment {}", args.environment_id))?;
        Ok(CallToolResult::json(&with_env_data(environment)))
    }
}

/// Tool to create an environment
pub struct CreateEnvironmentTool {
    client: SemaphoreClient,
}

impl CreateEnvironmentTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateEnvironmentArgs {
    project_id: i64,
    name: String,
    #[serde(default)]
    env_data: Map<String, Value>,
}

#[async_trait::async_trait]
impl Tool for CreateEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "create_environment",
            "Create an environment holding extra variables for tasks",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "name": json_schema_string("Environment name"),
                    "env_data": json_schema_value_map("Variables as key-value pairs")
                }),
                vec!["project_id", "name", "env_data"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: CreateEnvironmentArgs = parse_args("create_environment", arguments)?;
        let payload = json!({
            "project_id": args.project_id,
            "name": args.name,
            "json": encode_env_data("create_environment", &args.env_data)?,
            "env": "{}",
        });

        let environment = self
            .client
            .environments()
            .create(args.project_id, &payload)
            .await
            .during(format!("creating environment '{}'", args.name))?;
        Ok(CallToolResult::json(&with_env_data(environment)))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to update an environment
pub struct UpdateEnvironmentTool {
    client: SemaphoreClient,
}

impl UpdateEnvironmentTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateEnvironmentArgs {
    project_id: i64,
    environment_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    env_data: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for UpdateEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "update_environment",
            "Update an environment. env_data replaces all variables when given",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "environment_id": json_schema_integer("ID of the environment to update"),
                    "name": json_schema_string("New environment name"),
                    "env_data": json_schema_value_map("Variables as key-value pairs")
                }),
                vec!["project_id", "environment_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: UpdateEnvironmentArgs = parse_args("update_environment", arguments)?;
        let (project_id, environment_id) = (args.project_id, args.environment_id);
        let operation = format!("updating environment {}", environment_id);

        let mut updates = Map::new();
        if let Some(name) = args.name {
            updates.insert("name".to_string(), Value::String(name));
        }
        if let Some(env_data) = &args.env_data {
            updates.insert(
                "json".to_string(),
                Value::String(encode_env_data("update_environment", env_data)?),
            );
        }

        let environments = self.client.environments();
        let mut environment = environments
            .get(project_id, environment_id)
            .await
            .during(&operation)?;
        // Never send our decoded view back to the service.
        if let Value::Object(fields) = &mut environment {
            fields.remove("env_data");
        }
        apply_updates(&mut environment, updates);
        environments
            .update(project_id, environment_id, &environment)
            .await
            .during(&operation)?;

        let updated = environments
            .get(project_id, environment_id)
            .await
            .during(&operation)?;
        Ok(CallToolResult::json(&with_env_data(updated)))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to delete an environment
pub struct DeleteEnvironmentTool {
    client: SemaphoreClient,
}

impl DeleteEnvironmentTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "delete_environment",
            "Delete an environment",
            environment_schema("ID of the environment to delete"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: EnvironmentArgs = parse_args("delete_environment", arguments)?;
        self.client
            .environments()
            .delete(args.project_id, args.environment_id)
            .await
            .during(format!("deleting environment {}", args.environment_id))?;
        Ok(CallToolResult::json(&json!({
            "message": format!("Environment {} deleted", args.environment_id)
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

/// Tool to list inventories of a project
pub struct ListInventoryTool {
    client: SemaphoreClient,
}

impl ListInventoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListInventoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "list_inventory",
            "List all inventory items of a project",
            project_schema(),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectArgs = parse_args("list_inventory", arguments)?;
        let inventory = self
            .client
            .inventory()
            .list(args.project_id)
            .await
            .during(format!("listing inventory for project {}", args.project_id))?;
        Ok(CallToolResult::json(&Value::Array(inventory)))
    }
}

/// Tool to get a single inventory
pub struct GetInventoryTool {
    client: SemaphoreClient,
}

impl GetInventoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetInventoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_inventory",
            "Get details of a specific inventory item",
            inventory_schema("ID of the inventory item to fetch"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: InventoryArgs = parse_args("get_inventory", arguments)?;
        let inventory = self
            .client
            .inventory()
            .get(args.project_id, args.inventory_id)
            .await
            .during(format!("getting inventory {}", args.inventory_id))?;
        Ok(CallToolResult::json(&inventory))
    }
}

/// Tool to create an inventory
pub struct CreateInventoryTool {
    client: SemaphoreClient,
}

impl CreateInventoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateInventoryArgs {
    project_id: i64,
    name: String,
    inventory_data: String,
    #[serde(default = "default_inventory_type")]
    inventory_type: String,
    #[serde(default)]
    ssh_key_id: Option<i64>,
    #[serde(default)]
    become_key_id: Option<i64>,
}

fn default_inventory_type() -> String {
    "static".to_string()
}

#[async_trait::async_trait]
impl Tool for CreateInventoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "create_inventory",
            "Create an inventory item",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "name": json_schema_string("Inventory name"),
                    "inventory_data": json_schema_string("Inventory content (INI or YAML) or file path"),
                    "inventory_type": json_schema_string("static, static-yaml or file (default: static)"),
                    "ssh_key_id": json_schema_integer("Access key used to connect to hosts"),
                    "become_key_id": json_schema_integer("Access key used for privilege escalation")
                }),
                vec!["project_id", "name", "inventory_data"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: CreateInventoryArgs = parse_args("create_inventory", arguments)?;
        let mut payload = json!({
            "project_id": args.project_id,
            "name": args.name,
            "inventory": args.inventory_data,
            "type": args.inventory_type,
        });
        if let Some(key) = args.ssh_key_id {
            payload["ssh_key_id"] = json!(key);
        }
        if let Some(key) = args.become_key_id {
            payload["become_key_id"] = json!(key);
        }

        let inventory = self
            .client
            .inventory()
            .create(args.project_id, &payload)
            .await
            .during(format!("creating inventory '{}'", args.name))?;
        Ok(CallToolResult::json(&inventory))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to update an inventory
pub struct UpdateInventoryTool {
    client: SemaphoreClient,
}

impl UpdateInventoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateInventoryArgs {
    project_id: i64,
    inventory_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inventory_data: Option<String>,
    #[serde(default)]
    inventory_type: Option<String>,
    #[serde(default)]
    ssh_key_id: Option<i64>,
    #[serde(default)]
    become_key_id: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for UpdateInventoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "update_inventory",
            "Update an inventory item. Only the fields provided are changed",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "inventory_id": json_schema_integer("ID of the inventory item to update"),
                    "name": json_schema_string("New inventory name"),
                    "inventory_data": json_schema_string("Inventory content or file path"),
                    "inventory_type": json_schema_string("static, static-yaml or file"),
                    "ssh_key_id": json_schema_integer("Access key used to connect to hosts"),
                    "become_key_id": json_schema_integer("Access key used for privilege escalation")
                }),
                vec!["project_id", "inventory_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: UpdateInventoryArgs = parse_args("update_inventory", arguments)?;
        let (project_id, inventory_id) = (args.project_id, args.inventory_id);
        let operation = format!("updating inventory {}", inventory_id);

        let mut updates = Map::new();
        if let Some(name) = args.name {
            updates.insert("name".to_string(), json!(name));
        }
        if let Some(data) = args.inventory_data {
            updates.insert("inventory".to_string(), json!(data));
        }
        if let Some(kind) = args.inventory_type {
            updates.insert("type".to_string(), json!(kind));
        }
        if let Some(key) = args.ssh_key_id {
            updates.insert("ssh_key_id".to_string(), json!(key));
        }
        if let Some(key) = args.become_key_id {
            updates.insert("become_key_id".to_string(), json!(key));
        }

        let inventories = self.client.inventory();
        let mut inventory = inventories
            .get(project_id, inventory_id)
            .await
            .during(&operation)?;
        apply_updates(&mut inventory, updates);
        inventories
            .update(project_id, inventory_id, &inventory)
            .await
            .during(&operation)?;

        let updated = inventories
            .get(project_id, inventory_id)
            .await
            .during(&operation)?;
        Ok(CallToolResult::json(&updated))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to delete an inventory
pub struct DeleteInventoryTool {
    client: SemaphoreClient,
}

impl DeleteInventoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteInventoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "delete_inventory",
            "Delete an inventory item",
            inventory_schema("ID of the inventory item to delete"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: InventoryArgs = parse_args("delete_inventory", arguments)?;
        self.client
            .inventory()
            .delete(args.project_id, args.inventory_id)
            .await
            .during(format!("deleting inventory {}", args.inventory_id))?;
        Ok(CallToolResult::json(&json!({
            "message": format!("Inventory {} deleted", args.inventory_id)
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{client_for, result_json};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_with_env_data_decodes_json_field() {
        let env = with_env_data(json!({"id": 1, "json": "{\"A\":\"1\"}"}));
        assert_eq!(env["env_data"], json!({"A": "1"}));

        let broken = with_env_data(json!({"id": 1, "json": "not json"}));
        assert_eq!(broken["env_data"], json!({}));

        let missing = with_env_data(json!({"id": 1}));
        assert_eq!(missing["env_data"], json!({}));
    }

    #[tokio::test]
    async fn test_create_then_get_environment_round_trips_variables() {
        let server = MockServer::start().await;
        let stored = json!({
            "id": 3,
            "project_id": 1,
            "name": "Development",
            "json": "{\"API_URL\":\"http://api\",\"DEBUG\":\"true\"}",
            "env": "{}"
        });
        Mock::given(method("POST"))
            .and(path("/api/project/1/environment"))
            .and(body_partial_json(json!({
                "name": "Development",
                "json": "{\"API_URL\":\"http://api\",\"DEBUG\":\"true\"}",
                "env": "{}"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(stored.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/environment/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let env_data = json!({"DEBUG": "true", "API_URL": "http://api"});
        CreateEnvironmentTool::new(client.clone())
            .execute(json!({"project_id": 1, "name": "Development", "env_data": env_data}))
            .await
            .unwrap();

        let fetched = GetEnvironmentTool::new(client)
            .execute(json!({"project_id": 1, "environment_id": 3}))
            .await
            .unwrap();
        assert_eq!(result_json(&fetched)["env_data"], env_data);
    }

    #[tokio::test]
    async fn test_list_environments_decodes_each() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/environment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "json": "{\"X\":\"1\"}"},
                {"id": 2, "json": ""}
            ])))
            .mount(&server)
            .await;

        let tool = ListEnvironmentsTool::new(client_for(&server));
        let result = result_json(&tool.execute(json!({"project_id": 1})).await.unwrap());
        assert_eq!(result[0]["env_data"]["X"], "1");
        assert_eq!(result[1]["env_data"], json!({}));
    }

    #[tokio::test]
    async fn test_update_environment_replaces_variables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/environment/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3, "name": "Dev", "json": "{\"A\":\"1\"}", "env": "{}"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/project/1/environment/3"))
            .and(body_partial_json(json!({"name": "Dev", "json": "{\"B\":\"2\"}"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let tool = UpdateEnvironmentTool::new(client_for(&server));
        tool.execute(json!({"project_id": 1, "environment_id": 3, "env_data": {"B": "2"}}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_environment_accepts_fetched_variables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/1/environment/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3, "name": "Dev", "json": "{\"replicas\":3,\"debug\":true}", "env": "{}"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/project/1/environment/3"))
            .and(body_partial_json(json!({"json": "{\"debug\":true,\"replicas\":3}"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let fetched = GetEnvironmentTool::new(client.clone())
            .execute(json!({"project_id": 1, "environment_id": 3}))
            .await
            .unwrap();
        let env_data = result_json(&fetched)["env_data"].clone();
        assert_eq!(env_data, json!({"replicas": 3, "debug": true}));

        UpdateEnvironmentTool::new(client)
            .execute(json!({"project_id": 1, "environment_id": 3, "env_data": env_data}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_inventory_defaults_to_static() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/project/1/inventory"))
            .and(body_partial_json(json!({
                "name": "hosts",
                "inventory": "[web]\nweb1",
                "type": "static",
                "ssh_key_id": 4
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2, "name": "hosts"})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CreateInventoryTool::new(client_for(&server));
        let result = tool
            .execute(json!({
                "project_id": 1,
                "name": "hosts",
                "inventory_data": "[web]\nweb1",
                "ssh_key_id": 4
            }))
            .await
            .unwrap();
        assert_eq!(result_json(&result)["id"], 2);
    }

    #[tokio::test]
    async fn test_delete_inventory_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/project/1/inventory/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tool = DeleteInventoryTool::new(client_for(&server));
        let err = tool
            .execute(json!({"project_id": 1, "inventory_id": 9}))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Error during deleting inventory 9"));
        assert!(err.api_error().unwrap().is_not_found());
    }
}
