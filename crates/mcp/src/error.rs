// Errors raised by tool handlers

use semaphore_sdk::SemaphoreError;

pub type ToolResult<T> = Result<T, ToolError>;

/// Failure of a single tool invocation.
///
/// These never become JSON-RPC errors: the server renders them as a
/// `CallToolResult` with `isError: true` so the agent can read the message.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments did not match the tool's input schema.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// The Semaphore API call behind the tool failed.
    #[error("Error during {operation}: {source}")]
    Api {
        operation: String,
        #[source]
        source: SemaphoreError,
    },

    /// The tool could not complete for a reason of its own.
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    pub fn invalid_arguments(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// Underlying API error, if this failure came from Semaphore.
    pub fn api_error(&self) -> Option<&SemaphoreError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Attach the operation being performed to an API error.
pub trait ApiResultExt<T> {
    fn during(self, operation: impl Into<String>) -> ToolResult<T>;
}

impl<T> ApiResultExt<T> for Result<T, SemaphoreError> {
    fn during(self, operation: impl Into<String>) -> ToolResult<T> {
        self.map_err(|source| ToolError::Api {
            operation: operation.into(),
            source,
        })
    }
}
