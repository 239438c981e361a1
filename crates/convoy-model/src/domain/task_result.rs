use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Options;

/// One result event produced by a running task.
///
/// Long-running (watch-mode) tasks may produce several of these over their lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Whether this run of the task succeeded.
    pub success: bool,
    /// Human-readable failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Free-form details reported by the builder (exit code, output paths, ...).
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub info: Options,
}

impl TaskResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            info: Options::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
            info: Options::new(),
        }
    }

    pub fn with_info<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.info.insert(key, value);
        self
    }
}

impl From<bool> for TaskResult {
    fn from(success: bool) -> Self {
        Self {
            success,
            error: None,
            info: Options::new(),
        }
    }
}
