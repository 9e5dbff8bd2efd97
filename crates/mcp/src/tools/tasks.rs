// Task tools: running, stopping, filtering and failure analysis
//
// Everything beyond plain get/run/stop is aggregated client-side from
// several API calls. Bulk operations collect per-item failures instead of
// aborting the batch.

use crate::error::{ApiResultExt, ToolError, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_object,
    json_schema_string_map, parse_args, Tool, ToolTier,
};
use semaphore_sdk::types::{recency_key, resource_id};
use semaphore_sdk::{RunTaskRequest, SemaphoreClient, SemaphoreError, SemaphoreResult, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Tasks shown by `list_tasks` unless asked otherwise; keeps agent context small.
const DEFAULT_LIST_LIMIT: usize = 5;
const DEFAULT_FILTER_LIMIT: usize = 50;
const WAITING_TASKS_LIMIT: usize = 100;
const DEFAULT_ANALYZE_LIMIT: usize = 10;

/// Compact view of a task for previews and bulk listings.
pub(crate) fn task_summary(task: &Value) -> Value {
    json!({
        "id": task.get("id"),
        "template_id": task.get("template_id"),
        "status": task.get("status"),
        "created": task.get("created"),
        "start": task.get("start"),
        "message": task.get("message"),
    })
}

fn status_label(task: &Value) -> String {
    task.get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn parse_statuses(tool: &str, raw: &[String]) -> ToolResult<Vec<TaskStatus>> {
    if raw.is_empty() {
        return Err(ToolError::invalid_arguments(
            tool,
            "at least one status is required",
        ));
    }
    raw.iter()
        .map(|s| {
            s.parse::<TaskStatus>().map_err(|e| {
                let valid: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
                ToolError::invalid_arguments(tool, format!("{} (valid: {})", e, valid.join(", ")))
            })
        })
        .collect()
}

/// Status filter over a project's tasks.
#[derive(Debug, Clone)]
pub(crate) struct TaskQuery {
    pub statuses: Vec<TaskStatus>,
    pub limit: usize,
    pub use_last_tasks: bool,
}

#[derive(Debug)]
pub(crate) struct FilteredTasks {
    pub tasks: Vec<Value>,
    pub total: usize,
    pub status_counts: BTreeMap<String, usize>,
}

impl FilteredTasks {
    fn statistics(&self) -> Value {
        json!({
            "total_tasks": self.total,
            "filtered_tasks": self.tasks.len(),
            "status_counts": self.status_counts,
        })
    }
}

/// Fetch a project's tasks and keep those matching the query, in service order.
///
/// With `use_last_tasks` the cheaper `tasks/last` endpoint is tried first and
/// the full listing is used if it fails.
pub(crate) async fn filter_tasks(
    client: &SemaphoreClient,
    project_id: i64,
    query: &TaskQuery,
) -> SemaphoreResult<FilteredTasks> {
    let tasks = if query.use_last_tasks {
        match client.tasks().last(project_id).await {
            Ok(tasks) => tasks,
            Err(e) if e.is_auth() || e.is_connectivity() => return Err(e),
            Err(e) => {
                tracing::warn!(project_id, error = %e, "Recent tasks unavailable, using full task list");
                client.tasks().list(project_id).await?
            }
        }
    } else {
        client.tasks().list(project_id).await?
    };

    let mut status_counts = BTreeMap::new();
    for task in &tasks {
        *status_counts.entry(status_label(task)).or_insert(0) += 1;
    }

    let total = tasks.len();
    let tasks = tasks
        .into_iter()
        .filter(|t| TaskStatus::of(t).is_some_and(|s| query.statuses.contains(&s)))
        .take(query.limit)
        .collect();

    Ok(FilteredTasks {
        tasks,
        total,
        status_counts,
    })
}

/// Bundle everything an agent needs to diagnose a failed task.
///
/// Context lookups that fail are logged and left empty; only the task itself
/// is required.
pub(crate) async fn failure_analysis(
    client: &SemaphoreClient,
    project_id: i64,
    task_id: i64,
) -> ToolResult<Value> {
    let task = client
        .tasks()
        .get(project_id, task_id)
        .await
        .during(format!("analyzing task {}", task_id))?;

    let status = TaskStatus::of(&task);
    if status != Some(TaskStatus::Error) {
        return Ok(json!({
            "warning": format!(
                "Task {} has status '{}', not 'error'; failure analysis is only meaningful for failed tasks",
                task_id,
                status_label(&task)
            ),
            "task_id": task_id,
            "task_status": task.get("status"),
            "analysis_applicable": false,
        }));
    }

    let template_context = match task.get("template_id").and_then(Value::as_i64) {
        Some(template_id) => match client.templates().get(project_id, template_id).await {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(task_id, template_id, error = %e, "Template context unavailable");
                Value::Null
            }
        },
        None => Value::Null,
    };

    let project_context = match client.projects().get(project_id).await {
        Ok(project) => project,
        Err(e) => {
            tracing::warn!(task_id, project_id, error = %e, "Project context unavailable");
            Value::Null
        }
    };

    let structured = match client.tasks().output(project_id, task_id).await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(task_id, error = %e, "Structured output unavailable");
            Value::Null
        }
    };

    let raw = match client.tasks().raw_output(project_id, task_id).await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(task_id, error = %e, "Raw output unavailable");
            None
        }
    };

    let has_structured = match &structured {
        Value::Null => false,
        Value::Array(lines) => !lines.is_empty(),
        _ => true,
    };
    let has_raw = raw.as_deref().is_some_and(|t| !t.is_empty());

    Ok(json!({
        "analysis_ready": true,
        "task_id": task_id,
        "task_details": task,
        "template_context": template_context,
        "project_context": project_context,
        "outputs": {
            "structured": structured,
            "raw": raw,
            "has_structured_output": has_structured,
            "has_raw_output": has_raw,
        },
        "web_url": client.task_url(project_id, task_id),
        "analysis_guidance": {
            "focus_areas": [
                "The last failed task (TASK [...]) and its error message in the raw output",
                "Unreachable or failed hosts in the play recap",
                "Playbook, inventory and arguments in the template context",
                "Variables passed through the task environment",
            ],
        },
    }))
}

#[derive(Debug, Deserialize)]
struct ProjectArgs {
    project_id: i64,
}

#[derive(Debug, Deserialize)]
struct TaskArgs {
    project_id: i64,
    task_id: i64,
}

fn task_id_schema(task_doc: &str) -> Value {
    json_schema_object(
        json!({
            "project_id": json_schema_integer("ID of the project"),
            "task_id": json_schema_integer(task_doc)
        }),
        vec!["project_id", "task_id"],
    )
}

/// Tool to list the most recent tasks of a project
pub struct ListTasksTool {
    client: SemaphoreClient,
}

impl ListTasksTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListTasksArgs {
    project_id: i64,
    #[serde(default = "default_list_limit")]
    limit: usize,
}

fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

#[async_trait::async_trait]
impl Tool for ListTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "list_tasks",
            "List the most recent tasks of a project, newest first",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "limit": json_schema_integer("Maximum number of tasks to return (default: 5)")
                }),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ListTasksArgs = parse_args("list_tasks", arguments)?;
        if args.limit > DEFAULT_LIST_LIMIT {
            tracing::warn!(
                limit = args.limit,
                "Requesting many tasks may overload the agent's context window"
            );
        }

        let mut tasks = self
            .client
            .tasks()
            .list(args.project_id)
            .await
            .during(format!("listing tasks for project {}", args.project_id))?;

        let total = tasks.len();
        tasks.sort_by_cached_key(|t| std::cmp::Reverse(recency_key(t, &["created"])));
        tasks.truncate(args.limit);
        let shown = tasks.len();

        Ok(CallToolResult::json(&json!({
            "tasks": tasks,
            "total": total,
            "shown": shown,
            "note": format!("Showing {} of {} tasks (sorted by newest first)", shown, total),
        })))
    }
}

/// Tool to get a single task
pub struct GetTaskTool {
    client: SemaphoreClient,
}

impl GetTaskTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetTaskTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_task",
            "Get details of a specific task",
            task_id_schema("ID of the task to fetch"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: TaskArgs = parse_args("get_task", arguments)?;
        let task = self
            .client
            .tasks()
            .get(args.project_id, args.task_id)
            .await
            .during(format!("getting task {}", args.task_id))?;
        Ok(CallToolResult::json(&task))
    }
}

/// Tool to start a task from a template
pub struct RunTaskTool {
    client: SemaphoreClient,
}

impl RunTaskTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }

    /// Find the project owning a template by scanning every project's templates.
    async fn find_project(&self, template_id: i64) -> ToolResult<i64> {
        let projects = self
            .client
            .projects()
            .list()
            .await
            .during(format!("finding the project of template {}", template_id))?;

        for project_id in projects.iter().filter_map(resource_id) {
            match self.client.templates().list(project_id).await {
                Ok(templates) => {
                    if templates.iter().any(|t| resource_id(t) == Some(template_id)) {
                        return Ok(project_id);
                    }
                }
                Err(e) => {
                    tracing::warn!(project_id, error = %e, "Could not list templates while searching");
                }
            }
        }

        Err(ToolError::Failed(format!(
            "Could not determine project_id for template {}. Please provide it explicitly.",
            template_id
        )))
    }
}

#[derive(Debug, Deserialize)]
struct RunTaskArgs {
    template_id: i64,
    #[serde(default)]
    project_id: Option<i64>,
    #[serde(default)]
    environment: Option<BTreeMap<String, String>>,
}

#[async_trait::async_trait]
impl Tool for RunTaskTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "run_task",
            "Run a task from a template. The project is looked up when project_id is omitted",
            json_schema_object(
                json!({
                    "template_id": json_schema_integer("ID of the template to run"),
                    "project_id": json_schema_integer("ID of the project owning the template"),
                    "environment": json_schema_string_map("Extra variables passed to the task")
                }),
                vec!["template_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: RunTaskArgs = parse_args("run_task", arguments)?;
        let project_id = match args.project_id {
            Some(id) => id,
            None => self.find_project(args.template_id).await?,
        };

        let mut request = RunTaskRequest::new(args.template_id);
        if let Some(environment) = &args.environment {
            request = request
                .with_environment(environment)
                .map_err(|e| ToolError::invalid_arguments("run_task", e.to_string()))?;
        }

        let task = match self.client.tasks().run(project_id, &request).await {
            Ok(task) => task,
            Err(SemaphoreError::Validation { status, message }) if args.environment.is_some() => {
                return Err(ToolError::Failed(format!(
                    "Error during running template {}: validation failed (status {}): {}. \
                     The service may not accept the given environment variables",
                    args.template_id, status, message
                )));
            }
            Err(source) => {
                return Err(ToolError::Api {
                    operation: format!("running template {}", args.template_id),
                    source,
                })
            }
        };

        let task_id = resource_id(&task);
        tracing::info!(project_id, template_id = args.template_id, ?task_id, "Task started");

        let task_detail = task_id.map(|id| self.client.task_url(project_id, id));
        let message = match task_id {
            Some(id) => format!("Task {} started from template {}", id, args.template_id),
            None => format!("Task started from template {}", args.template_id),
        };
        Ok(CallToolResult::json(&json!({
            "task": task,
            "web_urls": {
                "task_detail": task_detail,
                "project_tasks": self.client.project_tasks_url(project_id),
            },
            "message": message,
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to stop a single task
pub struct StopTaskTool {
    client: SemaphoreClient,
}

impl StopTaskTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for StopTaskTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "stop_task",
            "Stop a running task",
            task_id_schema("ID of the task to stop"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: TaskArgs = parse_args("stop_task", arguments)?;
        self.client
            .tasks()
            .stop(args.project_id, args.task_id)
            .await
            .during(format!("stopping task {}", args.task_id))?;
        Ok(CallToolResult::json(&json!({
            "message": format!("Stop requested for task {}", args.task_id),
            "task_id": args.task_id,
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

/// Tool to filter a project's tasks by status
pub struct FilterTasksTool {
    client: SemaphoreClient,
}

impl FilterTasksTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct FilterTasksArgs {
    project_id: i64,
    status: Vec<String>,
    #[serde(default = "default_filter_limit")]
    limit: usize,
    #[serde(default = "default_true")]
    use_last_tasks: bool,
}

fn default_filter_limit() -> usize {
    DEFAULT_FILTER_LIMIT
}

fn default_true() -> bool {
    true
}

#[async_trait::async_trait]
impl Tool for FilterTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "filter_tasks",
            "Filter a project's tasks by status, keeping the service's order. \
             Accepts aliases such as 'failed' or 'successful'",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "status": json_schema_array(
                        json!({"type": "string"}),
                        "Statuses to keep: waiting, waiting_confirmation, starting, running, stopping, stopped, success, error"
                    ),
                    "limit": json_schema_integer("Maximum number of tasks to return (default: 50)"),
                    "use_last_tasks": json_schema_boolean("Search only recent tasks, which is faster (default: true)")
                }),
                vec!["project_id", "status"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: FilterTasksArgs = parse_args("filter_tasks", arguments)?;
        let query = TaskQuery {
            statuses: parse_statuses("filter_tasks", &args.status)?,
            limit: args.limit,
            use_last_tasks: args.use_last_tasks,
        };

        let filtered = filter_tasks(&self.client, args.project_id, &query)
            .await
            .during(format!("filtering tasks for project {}", args.project_id))?;

        Ok(CallToolResult::json(&json!({
            "tasks": filtered.tasks,
            "statistics": filtered.statistics(),
        })))
    }
}

/// Per-task result of a bulk stop.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum StopOutcome {
    Stopped { task_id: i64 },
    AlreadyStopped { task_id: i64, status: String },
    Failed { task_id: i64, error: String },
}

impl StopOutcome {
    fn succeeded(&self) -> bool {
        !matches!(self, StopOutcome::Failed { .. })
    }
}

/// Tool to stop several tasks at once
pub struct BulkStopTasksTool {
    client: SemaphoreClient,
}

impl BulkStopTasksTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }

    async fn stop_one(&self, project_id: i64, task_id: i64) -> StopOutcome {
        let tasks = self.client.tasks();
        let task = match tasks.get(project_id, task_id).await {
            Ok(task) => task,
            Err(e) => {
                return StopOutcome::Failed {
                    task_id,
                    error: e.to_string(),
                }
            }
        };

        if TaskStatus::of(&task).is_some_and(|s| s.is_stopped()) {
            return StopOutcome::AlreadyStopped {
                task_id,
                status: status_label(&task),
            };
        }

        match tasks.stop(project_id, task_id).await {
            Ok(()) => StopOutcome::Stopped { task_id },
            Err(e) => StopOutcome::Failed {
                task_id,
                error: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct BulkStopTasksArgs {
    project_id: i64,
    task_ids: Vec<i64>,
    #[serde(default)]
    dry_run: bool,
}

#[async_trait::async_trait]
impl Tool for BulkStopTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "bulk_stop_tasks",
            "Stop several tasks. Tasks that are already stopped count as succeeded; \
             failures are reported per task. Use dry_run to preview",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "task_ids": json_schema_array(json!({"type": "integer"}), "IDs of the tasks to stop"),
                    "dry_run": json_schema_boolean("Only show the tasks that would be stopped (default: false)")
                }),
                vec!["project_id", "task_ids"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: BulkStopTasksArgs = parse_args("bulk_stop_tasks", arguments)?;

        if args.dry_run {
            let mut preview = Vec::with_capacity(args.task_ids.len());
            for &task_id in &args.task_ids {
                match self.client.tasks().get(args.project_id, task_id).await {
                    Ok(task) => preview.push(task_summary(&task)),
                    Err(e) => preview.push(json!({"id": task_id, "error": e.to_string()})),
                }
            }
            return Ok(CallToolResult::json(&json!({
                "confirmation_required": true,
                "tasks_to_stop": args.task_ids.len(),
                "tasks": preview,
                "message": "Call again with dry_run set to false to stop these tasks",
            })));
        }

        let mut results = Vec::with_capacity(args.task_ids.len());
        for &task_id in &args.task_ids {
            results.push(self.stop_one(args.project_id, task_id).await);
        }

        let succeeded = results.iter().filter(|r| r.succeeded()).count();
        let failed: Vec<Value> = results
            .iter()
            .filter_map(|r| match r {
                StopOutcome::Failed { task_id, error } => {
                    Some(json!({"task_id": task_id, "error": error}))
                }
                _ => None,
            })
            .collect();

        if failed.is_empty() {
            tracing::info!(project_id = args.project_id, succeeded, "Bulk stop complete");
        } else {
            tracing::error!(
                project_id = args.project_id,
                succeeded,
                failed = failed.len(),
                "Bulk stop partially failed"
            );
        }

        Ok(CallToolResult::json(&json!({
            "total": args.task_ids.len(),
            "succeeded": succeeded,
            "failed": failed,
            "results": results,
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}

/// Tool to list tasks waiting in the queue
pub struct GetWaitingTasksTool {
    client: SemaphoreClient,
}

impl GetWaitingTasksTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetWaitingTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_waiting_tasks",
            "List tasks waiting to run, ready for a bulk stop",
            json_schema_object(
                json!({"project_id": json_schema_integer("ID of the project")}),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectArgs = parse_args("get_waiting_tasks", arguments)?;
        let query = TaskQuery {
            statuses: vec![TaskStatus::Waiting],
            limit: WAITING_TASKS_LIMIT,
            use_last_tasks: true,
        };
        let filtered = filter_tasks(&self.client, args.project_id, &query)
            .await
            .during(format!("getting waiting tasks for project {}", args.project_id))?;

        let task_ids: Vec<i64> = filtered.tasks.iter().filter_map(resource_id).collect();
        Ok(CallToolResult::json(&json!({
            "waiting_tasks": filtered.tasks,
            "count": task_ids.len(),
            "bulk_operations": {
                "task_ids": task_ids,
                "stop_all": {
                    "tool": "bulk_stop_tasks",
                    "arguments": {"project_id": args.project_id, "task_ids": task_ids},
                },
            },
        })))
    }
}

/// Tool to find the most recently started failed task
pub struct GetLatestFailedTaskTool {
    client: SemaphoreClient,
}

impl GetLatestFailedTaskTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetLatestFailedTaskTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_latest_failed_task",
            "Get the most recent failed task of a project",
            json_schema_object(
                json!({"project_id": json_schema_integer("ID of the project")}),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectArgs = parse_args("get_latest_failed_task", arguments)?;
        let tasks = self
            .client
            .tasks()
            .list(args.project_id)
            .await
            .during(format!(
                "getting latest failed task for project {}",
                args.project_id
            ))?;

        let latest = tasks
            .into_iter()
            .filter(|t| TaskStatus::of(t) == Some(TaskStatus::Error))
            .max_by_key(|t| recency_key(t, &["start", "created"]));

        let body = match latest {
            Some(task) => json!({"task": task}),
            None => json!({"message": "No failed tasks found for this project"}),
        };
        Ok(CallToolResult::json(&body))
    }
}

/// Tool to fetch a task's plain-text output
pub struct GetRawTaskOutputTool {
    client: SemaphoreClient,
}

impl GetRawTaskOutputTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetRawTaskOutputTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_raw_task_output",
            "Get the raw text output of a task, exactly as produced",
            task_id_schema("ID of the task"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: TaskArgs = parse_args("get_raw_task_output", arguments)?;
        let output = self
            .client
            .tasks()
            .raw_output(args.project_id, args.task_id)
            .await
            .during(format!("getting raw output of task {}", args.task_id))?;
        Ok(CallToolResult::text(output))
    }
}

/// Tool to gather the context needed to diagnose a failed task
pub struct AnalyzeTaskFailureTool {
    client: SemaphoreClient,
}

impl AnalyzeTaskFailureTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for AnalyzeTaskFailureTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "analyze_task_failure",
            "Collect a failed task with its template, project and full output for diagnosis",
            task_id_schema("ID of the failed task"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: TaskArgs = parse_args("analyze_task_failure", arguments)?;
        let analysis = failure_analysis(&self.client, args.project_id, args.task_id).await?;
        Ok(CallToolResult::json(&analysis))
    }
}

/// Tool to analyze the recent failures of a project together
pub struct BulkAnalyzeFailuresTool {
    client: SemaphoreClient,
}

impl BulkAnalyzeFailuresTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct BulkAnalyzeArgs {
    project_id: i64,
    #[serde(default = "default_analyze_limit")]
    limit: usize,
}

fn default_analyze_limit() -> usize {
    DEFAULT_ANALYZE_LIMIT
}

#[async_trait::async_trait]
impl Tool for BulkAnalyzeFailuresTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "bulk_analyze_failures",
            "Collect failure context for the recent failed tasks of a project",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "limit": json_schema_integer("Maximum number of failed tasks to analyze (default: 10)")
                }),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: BulkAnalyzeArgs = parse_args("bulk_analyze_failures", arguments)?;
        let query = TaskQuery {
            statuses: vec![TaskStatus::Error],
            limit: args.limit,
            use_last_tasks: true,
        };
        let filtered = filter_tasks(&self.client, args.project_id, &query)
            .await
            .during(format!("finding failed tasks for project {}", args.project_id))?;

        if filtered.tasks.is_empty() {
            return Ok(CallToolResult::json(&json!({
                "message": "No failed tasks found for this project",
                "failed_task_count": 0,
            })));
        }

        let mut analyses = Vec::new();
        let mut errors = Vec::new();
        let mut breakdown: BTreeMap<String, usize> = BTreeMap::new();

        for task_id in filtered.tasks.iter().filter_map(resource_id) {
            match failure_analysis(&self.client, args.project_id, task_id).await {
                Ok(analysis) => {
                    let template = analysis["template_context"]["name"]
                        .as_str()
                        .unwrap_or("Unknown")
                        .to_string();
                    *breakdown.entry(template).or_insert(0) += 1;
                    analyses.push(analysis);
                }
                Err(e) => {
                    tracing::warn!(task_id, error = %e, "Failure analysis skipped");
                    errors.push(json!({"task_id": task_id, "error": e.to_string()}));
                }
            }
        }

        Ok(CallToolResult::json(&json!({
            "bulk_analysis_complete": true,
            "total_failed_tasks": filtered.tasks.len(),
            "analyzed_tasks": analyses.len(),
            "template_failure_breakdown": breakdown,
            "analyses": analyses,
            "errors": errors,
        })))
    }
}
