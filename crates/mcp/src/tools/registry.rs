// Tool trait, registry and schema helpers

use crate::error::{ToolError, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: Value) -> ToolResult<CallToolResult>;

    /// How much the tool can change on the Semaphore side
    fn tier(&self) -> ToolTier {
        ToolTier::Tier0
    }
}

/// Tool side-effect tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolTier {
    /// Read-only operations
    Tier0,
    /// Creates or updates resources, or starts tasks
    Tier1,
    /// Deletes resources or stops running work
    Tier2,
}

impl ToolTier {
    /// MCP tool annotations advertised in `tools/list`.
    pub fn annotations(&self) -> Value {
        match self {
            ToolTier::Tier0 => serde_json::json!({"readOnlyHint": true}),
            ToolTier::Tier1 => serde_json::json!({"readOnlyHint": false, "destructiveHint": false}),
            ToolTier::Tier2 => serde_json::json!({"readOnlyHint": false, "destructiveHint": true}),
        }
    }
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        if self.tools.insert(schema.name.clone(), tool).is_some() {
            tracing::warn!(tool = %schema.name, "Tool registered twice, keeping the last one");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| {
                let mut schema = t.schema();
                schema.annotations = Some(t.tier().annotations());
                schema
            })
            .collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize tool arguments; a missing argument object counts as `{}`.
pub fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> ToolResult<T> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> Value {
    serde_json::json!({
        "type": "integer",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

pub fn json_schema_string_map(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": {"type": "string"},
        "description": description
    })
}

/// Object whose values may be any JSON type.
pub fn json_schema_value_map(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": true,
        "description": description
    })
}
