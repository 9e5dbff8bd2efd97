//! Shared types and response helpers.
//!
//! Semaphore resources are passed through as raw JSON. The helpers here deal
//! with the few places where the adapter has to look inside them: task status,
//! task timestamps, and list responses that may or may not be wrapped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a task as reported by Semaphore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Waiting,
    WaitingConfirmation,
    Starting,
    Running,
    Stopping,
    Stopped,
    Success,
    Error,
    Confirmed,
    Rejected,
}

impl TaskStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [TaskStatus; 10] = [
        TaskStatus::Waiting,
        TaskStatus::WaitingConfirmation,
        TaskStatus::Starting,
        TaskStatus::Running,
        TaskStatus::Stopping,
        TaskStatus::Stopped,
        TaskStatus::Success,
        TaskStatus::Error,
        TaskStatus::Confirmed,
        TaskStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Waiting => "waiting",
            TaskStatus::WaitingConfirmation => "waiting_confirmation",
            TaskStatus::Starting => "starting",
            TaskStatus::Running => "running",
            TaskStatus::Stopping => "stopping",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Success => "success",
            TaskStatus::Error => "error",
            TaskStatus::Confirmed => "confirmed",
            TaskStatus::Rejected => "rejected",
        }
    }

    /// Task has not finished yet and can still be stopped.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TaskStatus::Waiting
                | TaskStatus::WaitingConfirmation
                | TaskStatus::Starting
                | TaskStatus::Running
        )
    }

    /// Task is stopped or on its way there.
    pub fn is_stopped(&self) -> bool {
        matches!(self, TaskStatus::Stopping | TaskStatus::Stopped)
    }

    /// Status of a raw task object, if present and recognised.
    pub fn of(task: &Value) -> Option<TaskStatus> {
        task.get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Accepts service names plus the friendlier aliases agents tend to use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting" | "queued" | "pending" => Ok(TaskStatus::Waiting),
            "waiting_confirmation" => Ok(TaskStatus::WaitingConfirmation),
            "starting" => Ok(TaskStatus::Starting),
            "running" => Ok(TaskStatus::Running),
            "stopping" => Ok(TaskStatus::Stopping),
            "stopped" | "cancelled" | "canceled" => Ok(TaskStatus::Stopped),
            "success" | "successful" | "succeeded" => Ok(TaskStatus::Success),
            "error" | "failed" | "failure" => Ok(TaskStatus::Error),
            "confirmed" => Ok(TaskStatus::Confirmed),
            "rejected" => Ok(TaskStatus::Rejected),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// Items of a list response.
///
/// Semaphore answers with a bare array, but some versions and proxies wrap it
/// as `{"<key>": [...]}`. Anything else yields an empty list.
pub fn extract_list(value: Value, key: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Integer id of a resource object.
pub fn resource_id(value: &Value) -> Option<i64> {
    value.get("id").and_then(Value::as_i64)
}

/// Parse an RFC 3339 timestamp field of a resource object.
pub fn timestamp(value: &Value, field: &str) -> Option<DateTime<Utc>> {
    value
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Sort key for "most recent" ordering of tasks.
///
/// Prefers the parsed timestamp of the first present field; falls back to the
/// raw string so that non-RFC 3339 values still order lexically.
pub fn recency_key(task: &Value, fields: &[&str]) -> (Option<DateTime<Utc>>, String) {
    for field in fields {
        if let Some(raw) = task.get(*field).and_then(Value::as_str) {
            if raw.is_empty() {
                continue;
            }
            return (timestamp(task, field), raw.to_string());
        }
    }
    (None, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_aliases() {
        assert_eq!("failed".parse::<TaskStatus>().unwrap(), TaskStatus::Error);
        assert_eq!("successful".parse::<TaskStatus>().unwrap(), TaskStatus::Success);
        assert_eq!("Running".parse::<TaskStatus>().unwrap(), TaskStatus::Running);
        assert!("bogus".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_of_task() {
        assert_eq!(TaskStatus::of(&json!({"status": "stopped"})), Some(TaskStatus::Stopped));
        assert_eq!(TaskStatus::of(&json!({"id": 1})), None);
        assert!(TaskStatus::Stopping.is_stopped());
        assert!(TaskStatus::Waiting.is_active());
        assert!(!TaskStatus::Error.is_active());
    }

    #[test]
    fn test_waiting_confirmation_is_active() {
        let status: TaskStatus = "waiting_confirmation".parse().unwrap();
        assert_eq!(status, TaskStatus::WaitingConfirmation);
        assert_eq!(status.to_string(), "waiting_confirmation");
        assert!(status.is_active());
        assert!(!status.is_stopped());
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            json!("waiting_confirmation")
        );
    }

    #[test]
    fn test_extract_list_shapes() {
        assert_eq!(extract_list(json!([{"id": 1}]), "tasks").len(), 1);
        assert_eq!(extract_list(json!({"tasks": [{"id": 1}, {"id": 2}]}), "tasks").len(), 2);
        assert!(extract_list(json!({"other": []}), "tasks").is_empty());
        assert!(extract_list(Value::Null, "tasks").is_empty());
    }

    #[test]
    fn test_recency_key_orders_by_parsed_time() {
        let older = json!({"start": "2024-01-01T10:00:00Z"});
        let newer = json!({"start": "2024-01-01T11:00:00+01:00", "created": "2023-01-01T00:00:00Z"});
        let latest = json!({"start": "2024-01-01T10:30:00Z"});

        // 11:00+01:00 is 10:00Z, equal to `older`, and before `latest`.
        assert!(recency_key(&latest, &["start"]) > recency_key(&newer, &["start"]));
        assert_eq!(
            recency_key(&older, &["start"]).0,
            recency_key(&newer, &["start"]).0
        );
    }

    #[test]
    fn test_recency_key_falls_back_to_created() {
        let task = json!({"start": null, "created": "2024-05-01T00:00:00Z"});
        let (parsed, raw) = recency_key(&task, &["start", "created"]);
        assert!(parsed.is_some());
        assert_eq!(raw, "2024-05-01T00:00:00Z");
    }
}
