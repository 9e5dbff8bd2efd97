// Repository tools

use crate::error::{ApiResultExt, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    apply_updates, json_schema_integer, json_schema_object, json_schema_string, parse_args,
    Tool, ToolTier,
};
use semaphore_sdk::SemaphoreClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Deserialize)]
struct ProjectArgs {
    project_id: i64,
}

#[derive(Debug, Deserialize)]
struct RepositoryArgs {
    project_id: i64,
    repository_id: i64,
}

fn repository_schema(doc: &str) -> Value {
    json_schema_object(
        json!({
            "project_id": json_schema_integer("ID of the project"),
            "repository_id": json_schema_integer(doc)
        }),
        vec!["project_id", "repository_id"],
    )
}

/// Tool to list repositories of a project
pub struct ListRepositoriesTool {
    client: SemaphoreClient,
}

impl ListRepositoriesTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListRepositoriesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "list_repositories",
            "List all repositories of a project",
            json_schema_object(
                json!({"project_id": json_schema_integer("ID of the project")}),
                vec!["project_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ProjectArgs = parse_args("list_repositories", arguments)?;
        let repositories = self
            .client
            .repositories()
            .list(args.project_id)
            .await
            .during(format!("listing repositories for project {}", args.project_id))?;
        Ok(CallToolResult::json(&json!({"repositories": repositories})))
    }
}

/// Tool to get a single repository
pub struct GetRepositoryTool {
    client: SemaphoreClient,
}

impl GetRepositoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetRepositoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "get_repository",
            "Get details of a specific repository",
            repository_schema("ID of the repository to fetch"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: RepositoryArgs = parse_args("get_repository", arguments)?;
        let repository = self
            .client
            .repositories()
            .get(args.project_id, args.repository_id)
            .await
            .during(format!("getting repository {}", args.repository_id))?;
        Ok(CallToolResult::json(&repository))
    }
}

/// Tool to create a repository
pub struct CreateRepositoryTool {
    client: SemaphoreClient,
}

impl CreateRepositoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateRepositoryArgs {
    project_id: i64,
    name: String,
    git_url: String,
    git_branch: String,
    ssh_key_id: i64,
}

#[async_trait::async_trait]
impl Tool for CreateRepositoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "create_repository",
            "Register a git repository with a project",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "name": json_schema_string("Repository name"),
                    "git_url": json_schema_string("Clone URL, e.g. https://github.com/org/playbooks.git"),
                    "git_branch": json_schema_string("Branch to check out"),
                    "ssh_key_id": json_schema_integer("Access key used to clone; use the 'None' key for public repositories")
                }),
                vec!["project_id", "name", "git_url", "git_branch", "ssh_key_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: CreateRepositoryArgs = parse_args("create_repository", arguments)?;
        let payload = json!({
            "project_id": args.project_id,
            "name": args.name,
            "git_url": args.git_url,
            "git_branch": args.git_branch,
            "ssh_key_id": args.ssh_key_id,
        });

        let repository = self
            .client
            .repositories()
            .create(args.project_id, &payload)
            .await
            .during(format!("creating repository '{}'", args.name))?;
        Ok(CallToolResult::json(&repository))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to update a repository
pub struct UpdateRepositoryTool {
    client: SemaphoreClient,
}

impl UpdateRepositoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateRepositoryArgs {
    project_id: i64,
    repository_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    git_url: Option<String>,
    #[serde(default)]
    git_branch: Option<String>,
    #[serde(default)]
    ssh_key_id: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for UpdateRepositoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "update_repository",
            "Update a repository. Only the fields provided are changed",
            json_schema_object(
                json!({
                    "project_id": json_schema_integer("ID of the project"),
                    "repository_id": json_schema_integer("ID of the repository to update"),
                    "name": json_schema_string("New repository name"),
                    "git_url": json_schema_string("Clone URL"),
                    "git_branch": json_schema_string("Branch to check out"),
                    "ssh_key_id": json_schema_integer("Access key used to clone")
                }),
                vec!["project_id", "repository_id"],
            ),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: UpdateRepositoryArgs = parse_args("update_repository", arguments)?;
        let (project_id, repository_id) = (args.project_id, args.repository_id);
        let operation = format!("updating repository {}", repository_id);

        let mut updates = Map::new();
        for (key, value) in [
            ("name", args.name),
            ("git_url", args.git_url),
            ("git_branch", args.git_branch),
        ] {
            if let Some(value) = value {
                updates.insert(key.to_string(), Value::String(value));
            }
        }
        if let Some(key) = args.ssh_key_id {
            updates.insert("ssh_key_id".to_string(), json!(key));
        }

        let repositories = self.client.repositories();
        let mut repository = repositories
            .get(project_id, repository_id)
            .await
            .during(&operation)?;
        apply_updates(&mut repository, updates);
        repositories
            .update(project_id, repository_id, &repository)
            .await
            .during(&operation)?;

        let updated = repositories
            .get(project_id, repository_id)
            .await
            .during(&operation)?;
        Ok(CallToolResult::json(&updated))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier1
    }
}

/// Tool to delete a repository
pub struct DeleteRepositoryTool {
    client: SemaphoreClient,
}

impl DeleteRepositoryTool {
    pub fn new(client: SemaphoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteRepositoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "delete_repository",
            "Delete a repository",
            repository_schema("ID of the repository to delete"),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult> {
        let args: RepositoryArgs = parse_args("delete_repository", arguments)?;
        self.client
            .repositories()
            .delete(args.project_id, args.repository_id)
            .await
            .during(format!("deleting repository {}", args.repository_id))?;
        Ok(CallToolResult::json(&json!({
            "message": format!("Repository {} deleted", args.repository_id)
        })))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Tier2
    }
}
