// Template tools: CRUD over task templates plus stopping all of a template's tasks

use crate::error::{ApiResultExt, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::tasks::task_summary;
use crate::tools::{
    apply_updates, json_schema_boolean, json_schema_integer, json_schema_object,
    json_schema_string, parse_args, Tool, ToolTier,
};
use semaphore_sdk::SemaphoreClient;
use semaphore_sdk::TaskStatus;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Deserialize)]
struct ProjectArgs {
    project_id: i64,
}

#[derive(Debug, Deserialize)]
struct TemplateArgs {
    project_id: i64,
    template_id: i64,
}

fn template_id_schema(template_doc: &str) -> Value {
    json_schema_object(
        json!({
            "project_id": json_schema_integer("ID of the project"),
            "template_id": json_schema_integer(template_doc)
        }),
        vec!["project_id", "template_id"],
    )
}

/// Tool to list templates of a project
pub struct ListTemplatesTool {
    client: SemaphoreClient,
}

impl ListTemplatesTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListTemplatesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "list_templates",
            "List all templates for a project",
            json_schema_object(
                json!({"project_id": json_schema_integer("ID of the project")}),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectArgs = parse_args("list_templates", arguments)?;
        let templates = self
            .client
            .templates()
            .list(args.project_id)
            .await
            .during(format!("listing templates for project {}", args.project_id))?;
        Ok(CallToolResult::json(&Value::Array(templates)))
    }
}

/// Tool to get a single template
pub struct GetTemplateTool {
    client: SemaphoreClient,
}

impl GetTemplateTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetTemplateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_template",
            "Get details of a specific template",
            template_id_schema("ID of the template to fetch"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: TemplateArgs = parse_args("get_template", arguments)?;
        let template = self
            .client
            .templates()
            .get(args.project_id, args.template_id)
            .await
            .during(format!("getting template {}", args.template_id))?;
        Ok(CallToolResult::json(&template))
    }
}

/// Tool to create a template
pub struct CreateTemplateTool {
    client: SemaphoreClient,
}

impl CreateTemplateTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTemplateArgs {
    project_id: i64,
    name: String,
    playbook: String,
    inventory_id: i64,
    repository_id: i64,
    environment_id: i64,
    #[serde(default = "default_app")]
    app: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
    #[serde(default, rename = "type")]
    template_type: Option<String>,
}

fn default_app() -> String {
    "ansible".to_string()
}

#[async_trait::async_trait]
impl Tool for CreateTemplateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "create_template",
            "Create a new task template",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "name": json_schema_string("Template name"),
                    "playbook": json_schema_string("Playbook file, relative to the repository root"),
                    "inventory_id": json_schema_integer("Inventory to run against"),
                    "repository_id": json_schema_integer("Repository holding the playbook"),
                    "environment_id": json_schema_integer("Environment providing variables"),
                    "app": json_schema_string("Runner application (default: ansible)"),
                    "description": json_schema_string("Template description"),
                    "arguments": json_schema_string("Extra CLI arguments as a JSON array string, e.g. '[\"-v\"]'"),
                    "type": json_schema_string("Template type: '' (task), 'build' or 'deploy'")
                }),
                vec![
                    "project_id",
                    "name",
                    "playbook",
                    "inventory_id",
                    "repository_id",
                    "environment_id",
                ],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: CreateTemplateArgs = parse_args("create_template", arguments)?;
        let mut payload = json!({
            "project_id": args.project_id,
            "name": args.name,
            "playbook": args.playbook,
            "inventory_id": args.inventory_id,
            "repository_id": args.repository_id,
            "environment_id": args.environment_id,
            "app": args.app,
        });
        if let Some(description) = args.description {
            payload["description"] = Value::String(description);
        }
        if let Some(extra) = args.arguments {
            payload["arguments"] = Value::String(extra);
        }
        if let Some(template_type) = args.template_type {
            payload["type"] = Value::String(template_type);
        }

        let template = self
            .client
            .templates()
            .create(args.project_id, &payload)
            .await
            .during(format!("creating template '{}'", args.name))?;
        Ok(CallToolResult::json(&template))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to update a template
pub struct UpdateTemplateTool {
    client: SemaphoreClient,
}

impl UpdateTemplateTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateTemplateArgs {
    project_id: i64,
    template_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    playbook: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
    #[serde(default)]
    inventory_id: Option<i64>,
    #[serde(default)]
    repository_id: Option<i64>,
    #[serde(default)]
    environment_id: Option<i64>,
}

impl UpdateTemplateArgs {
    fn updates(self) -> Map<String, Value> {
        let mut updates = Map::new();
        let strings = [
            ("name", self.name),
            ("playbook", self.playbook),
            ("description", self.description),
            ("arguments", self.arguments),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                updates.insert(key.to_string(), Value::String(value));
            }
        }
        let ids = [
            ("inventory_id", self.inventory_id),
            ("repository_id", self.repository_id),
            ("environment_id", self.environment_id),
        ];
        for (key, value) in ids {
            if let Some(value) = value {
                updates.insert(key.to_string(), json!(value));
            }
        }
        updates
    }
}

#[async_trait::async_trait]
impl Tool for UpdateTemplateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "update_template",
            "Update a template. Only the fields provided are changed",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "template_id": json_schema_integer("ID of the template to update"),
                    "name": json_schema_string("New template name"),
                    "playbook": json_schema_string("Playbook file"),
                    "description": json_schema_string("Template description"),
                    "arguments": json_schema_string("Extra CLI arguments as a JSON array string"),
                    "inventory_id": json_schema_integer("Inventory to run against"),
                    "repository_id": json_schema_integer("Repository holding the playbook"),
                    "environment_id": json_schema_integer("Environment providing variables")
                }),
                vec!["project_id", "template_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: UpdateTemplateArgs = parse_args("update_template", arguments)?;
        let (project_id, template_id) = (args.project_id, args.template_id);
        let operation = format!("updating template {}", template_id);
        let templates = self.client.templates();

        let mut template = templates
            .get(project_id, template_id)
            .await
            .during(&operation)?;
        apply_updates(&mut template, args.updates());
        templates
            .update(project_id, template_id, &template)
            .await
            .during(&operation)?;

        let updated = templates
            .get(project_id, template_id)
            .await
            .during(&operation)?;
        Ok(CallToolResult::json(&updated))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to delete a template
pub struct DeleteTemplateTool {
    client: SemaphoreClient,
}

impl DeleteTemplateTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteTemplateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "delete_template",
            "Delete a template",
            template_id_schema("ID of the template to delete"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: TemplateArgs = parse_args("delete_template", arguments)?;
        self.client
            .templates()
            .delete(args.project_id, args.template_id)
            .await
            .during(format!("deleting template {}", args.template_id))?;
        Ok(CallToolResult::json(&json!({
            "message": format!("Template {} deleted", args.template_id)
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

/// Tool to stop every active task of a template
pub struct StopAllTasksTool {
    client: SemaphoreClient,
}

impl StopAllTasksTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct StopAllTasksArgs {
    project_id: i64,
    template_id: i64,
    #[serde(default)]
    dry_run: bool,
}

#[async_trait::async_trait]
impl Tool for StopAllTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "stop_all_tasks",
            "Stop all waiting, starting and running tasks of a template. \
             Use dry_run to preview which tasks would be stopped",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "template_id": json_schema_integer("ID of the template"),
                    "dry_run": json_schema_boolean("Only list the tasks that would be stopped (default: false)")
                }),
                vec!["project_id", "template_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: StopAllTasksArgs = parse_args("stop_all_tasks", arguments)?;
        let operation = format!("stopping all tasks of template {}", args.template_id);

        let tasks = self
            .client
            .tasks()
            .list(args.project_id)
            .await
            .during(&operation)?;
        let active: Vec<Value> = tasks
            .iter()
            .filter(|t| t.get("template_id").and_then(Value::as_i64) == Some(args.template_id))
            .filter(|t| TaskStatus::of(t).is_some_and(|s| s.is_active()))
            .map(task_summary)
            .collect();

        if args.dry_run {
            return Ok(CallToolResult::json(&json!({
                "dry_run": true,
                "template_id": args.template_id,
                "active_task_count": active.len(),
                "tasks": active,
            })));
        }

        self.client
            .templates()
            .stop_all_tasks(args.project_id, args.template_id)
            .await
            .during(&operation)?;

        tracing::info!(
            template_id = args.template_id,
            count = active.len(),
            "Stopped all tasks of template"
        );
        Ok(CallToolResult::json(&json!({
            "message": format!(
                "Stop requested for {} active task(s) of template {}",
                active.len(),
                args.template_id
            ),
            "template_id": args.template_id,
            "stopped_task_count": active.len(),
            "tasks": active,
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}
