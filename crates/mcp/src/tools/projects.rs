// Project tools: CRUD over Semaphore projects

use crate::error::{ApiResultExt, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    apply_updates, json_schema_boolean, json_schema_integer, json_schema_object,
    json_schema_string, parse_args, Tool, ToolTier,
};
use semaphore_sdk::SemaphoreClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Tool to list all projects
pub struct ListProjectsTool {
    client: SemaphoreClient,
}

impl ListProjectsTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListProjectsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "list_projects",
            "List all projects in Semaphore",
            json_schema_object(json!({}), vec![]),
        )
    }

    async fn execute(&self, _arguments: Value) -> ToolResult<CallToolResult> {
        let projects = self.client.projects().list().await.during("listing projects")?;
        Ok(CallToolResult::json(&Value::Array(projects)))
    }
}

/// Tool to get a single project
pub struct GetProjectTool {
    client: SemaphoreClient,
}

impl GetProjectTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectIdArgs {
    project_id: i64,
}

#[async_trait::async_trait]
impl Tool for GetProjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_project",
            "Get details of a specific project",
            json_schema_object(
                json!({"project_id": json_schema_integer("ID of the project to fetch")}),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectIdArgs = parse_args("get_project", arguments)?;
        let project = self
            .client
            .projects()
            .get(args.project_id)
            .await
            .during(format!("getting project {}", args.project_id))?;
        Ok(CallToolResult::json(&project))
    }
}

/// Tool to create a project
pub struct CreateProjectTool {
    client: SemaphoreClient,
}

impl CreateProjectTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateProjectArgs {
    name: String,
    #[serde(default)]
    alert: bool,
    #[serde(default)]
    alert_chat: Option<String>,
    #[serde(default)]
    max_parallel_tasks: i64,
}

#[async_trait::async_trait]
impl Tool for CreateProjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "create_project",
            "Create a new project",
            json_schema_object(
                json!({
                    "name": json_schema_string("Project name"),
                    "alert": json_schema_boolean("Send alerts when tasks fail (default: false)"),
                    "alert_chat": json_schema_string("Chat ID that receives alerts"),
                    "max_parallel_tasks": json_schema_integer("Maximum concurrently running tasks, 0 for unlimited (default: 0)")
                }),
                vec!["name"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: CreateProjectArgs = parse_args("create_project", arguments)?;
        let mut payload = json!({
            "name": args.name,
            "alert": args.alert,
            "max_parallel_tasks": args.max_parallel_tasks,
        });
        if let Some(chat) = args.alert_chat {
            payload["alert_chat"] = Value::String(chat);
        }

        let project = self
            .client
            .projects()
            .create(&payload)
            .await
            .during(format!("creating project '{}'", args.name))?;
        Ok(CallToolResult::json(&project))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to update a project
pub struct UpdateProjectTool {
    client: SemaphoreClient,
}

impl UpdateProjectTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateProjectArgs {
    project_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    alert: Option<bool>,
    #[serde(default)]
    alert_chat: Option<String>,
    #[serde(default)]
    max_parallel_tasks: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for UpdateProjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "update_project",
            "Update a project. Only the fields provided are changed",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project to update"),
                    "name": json_schema_string("New project name"),
                    "alert": json_schema_boolean("Send alerts when tasks fail"),
                    "alert_chat": json_schema_string("Chat ID that receives alerts"),
                    "max_parallel_tasks": json_schema_integer("Maximum concurrently running tasks")
                }),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: UpdateProjectArgs = parse_args("update_project", arguments)?;
        let operation = format!("updating project {}", args.project_id);
        let projects = self.client.projects();

        let mut updates = Map::new();
        if let Some(name) = args.name {
            updates.insert("name".to_string(), json!(name));
        }
        if let Some(alert) = args.alert {
            updates.insert("alert".to_string(), json!(alert));
        }
        if let Some(chat) = args.alert_chat {
            updates.insert("alert_chat".to_string(), json!(chat));
        }
        if let Some(max) = args.max_parallel_tasks {
            updates.insert("max_parallel_tasks".to_string(), json!(max));
        }

        let mut project = projects.get(args.project_id).await.during(&operation)?;
        apply_updates(&mut project, updates);
        projects
            .update(args.project_id, &project)
            .await
            .during(&operation)?;

        let updated = projects.get(args.project_id).await.during(&operation)?;
        Ok(CallToolResult::json(&updated))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to delete a project
pub struct DeleteProjectTool {
    client: SemaphoreClient,
}

impl DeleteProjectTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteProjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "delete_project",
            "Delete a project and everything in it",
            json_schema_object(
                json!({"project_id": json_schema_integer("ID of the project to delete")}),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectIdArgs = parse_args("delete_project", arguments)?;
        self.client
            .projects()
            .delete(args.project_id)
            .await
            .during(format!("deleting project {}", args.project_id))?;
        Ok(CallToolResult::json(&json!({
            "message": format!("Project {} deleted", args.project_id)
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}
