pub mod environments;
pub mod projects;
pub mod repositories;
pub mod tasks;
pub mod templates;
mod registry;

pub use environments::{
    CreateEnvironmentTool, CreateInventoryTool, DeleteEnvironmentTool, DeleteInventoryTool,
    GetEnvironmentTool, GetInventoryTool, ListEnvironmentsTool, ListInventoryTool,
    UpdateEnvironmentTool, UpdateInventoryTool,
};
pub use projects::{
    CreateProjectTool, DeleteProjectTool, GetProjectTool, ListProjectsTool, UpdateProjectTool,
};
pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_object,
    json_schema_string, json_schema_string_map, json_schema_value_map, parse_args, Tool,
    ToolRegistry, ToolTier,
};
pub use repositories::{
    CreateRepositoryTool, DeleteRepositoryTool, GetRepositoryTool, ListRepositoriesTool,
    UpdateRepositoryTool,
};
pub use tasks::{
    AnalyzeTaskFailureTool, BulkAnalyzeFailuresTool, BulkStopTasksTool, FilterTasksTool,
    GetLatestFailedTaskTool, GetRawTaskOutputTool, GetTaskTool, GetWaitingTasksTool,
    ListTasksTool, RunTaskTool, StopTaskTool,
};
pub use templates::{
    CreateTemplateTool, DeleteTemplateTool, GetTemplateTool, ListTemplatesTool,
    StopAllTasksTool, UpdateTemplateTool,
};

use semaphore_sdk::SemaphoreClient;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Registry holding every Semaphore tool, all sharing one client.
pub fn semaphore_registry(client: SemaphoreClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Projects
    registry.register(Arc::new(ListProjectsTool::new(client.clone())));
    registry.register(Arc::new(GetProjectTool::new(client.clone())));
    registry.register(Arc::new(CreateProjectTool::new(client.clone())));
    registry.register(Arc::new(UpdateProjectTool::new(client.clone())));
    registry.register(Arc::new(DeleteProjectTool::new(client.clone())));

    // Templates
    registry.register(Arc::new(ListTemplatesTool::new(client.clone())));
    registry.register(Arc::new(GetTemplateTool::new(client.clone())));
    registry.register(Arc::new(CreateTemplateTool::new(client.clone())));
    registry.register(Arc::new(UpdateTemplateTool::new(client.clone())));
    registry.register(Arc::new(DeleteTemplateTool::new(client.clone())));
    registry.register(Arc::new(StopAllTasksTool::new(client.clone())));

    // Tasks
    registry.register(Arc::new(ListTasksTool::new(client.clone())));
    registry.register(Arc::new(GetTaskTool::new(client.clone())));
    registry.register(Arc::new(RunTaskTool::new(client.clone())));
    registry.register(Arc::new(StopTaskTool::new(client.clone())));
    registry.register(Arc::new(FilterTasksTool::new(client.clone())));
    registry.register(Arc::new(BulkStopTasksTool::new(client.clone())));
    registry.register(Arc::new(GetWaitingTasksTool::new(client.clone())));
    registry.register(Arc::new(GetLatestFailedTaskTool::new(client.clone())));
    registry.register(Arc::new(GetRawTaskOutputTool::new(client.clone())));
    registry.register(Arc::new(AnalyzeTaskFailureTool::new(client.clone())));
    registry.register(Arc::new(BulkAnalyzeFailuresTool::new(client.clone())));

    // Environments and inventory
    registry.register(Arc::new(ListEnvironmentsTool::new(client.clone())));
    registry.register(Arc::new(GetEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(CreateEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(UpdateEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(DeleteEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(ListInventoryTool::new(client.clone())));
    registry.register(Arc::new(GetInventoryTool::new(client.clone())));
    registry.register(Arc::new(CreateInventoryTool::new(client.clone())));
    registry.register(Arc::new(UpdateInventoryTool::new(client.clone())));
    registry.register(Arc::new(DeleteInventoryTool::new(client.clone())));

    // Repositories
    registry.register(Arc::new(ListRepositoriesTool::new(client.clone())));
    registry.register(Arc::new(GetRepositoryTool::new(client.clone())));
    registry.register(Arc::new(CreateRepositoryTool::new(client.clone())));
    registry.register(Arc::new(UpdateRepositoryTool::new(client.clone())));
    registry.register(Arc::new(DeleteRepositoryTool::new(client)));

    registry
}

/// Overwrite fields of a fetched resource before sending it back with PUT.
///
/// Semaphore's PUT endpoints replace the whole object, so partial updates are
/// done as read, merge, write.
pub(crate) fn apply_updates(resource: &mut Value, updates: Map<String, Value>) {
    if let Value::Object(fields) = resource {
        fields.extend(updates);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::protocol::CallToolResult;
    use semaphore_sdk::SemaphoreClient;
    use serde_json::Value;
    use wiremock::MockServer;

    pub fn client_for(server: &MockServer) -> SemaphoreClient {
        SemaphoreClient::builder()
            .base_url(server.uri())
            .api_token("test-token")
            .build()
            .unwrap()
    }

    /// Parse the JSON text block of a successful tool result.
    pub fn result_json(result: &CallToolResult) -> Value {
        assert!(!result.is_error(), "unexpected tool error: {}", result.text_content());
        serde_json::from_str(&result.text_content()).unwrap()
    }
}
