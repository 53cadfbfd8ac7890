//! Command types: parameters, results, and execution context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DaemonError, ValidationErrorKind};

/// Wrapper around command parameters with helper methods.
#[derive(Debug, Clone)]
pub struct CommandParams {
    inner: serde_json::Value,
}

impl CommandParams {
    /// Create new command parameters from a JSON value.
    pub fn new(value: serde_json::Value) -> Self {
        Self { inner: value }
    }

    /// Get a required string parameter.
    pub fn get_string(&self, key: &str) -> Result<String, DaemonError> {
        self.inner
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| DaemonError::Validation {
                kind: ValidationErrorKind::MissingParameter {
                    param: key.to_string(),
                },
            })
    }

    /// Get an optional string parameter.
    pub fn get_optional_string(&self, key: &str) -> Option<String> {
        self.inner.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
    }

    /// Require that a string parameter exists (for validation).
    pub fn require_string(&self, key: &str) -> Result<(), DaemonError> {
        if self.inner.get(key).and_then(|v| v.as_str()).is_some() {
            Ok(())
        } else {
            Err(DaemonError::Validation {
                kind: ValidationErrorKind::MissingParameter {
                    param: key.to_string(),
                },
            })
        }
    }
}

impl From<serde_json::Value> for CommandParams {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

/// Result of command execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,
    /// Result data on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error code on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CommandResult {
    /// Create a success result with data.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_code: None,
            error_message: None,
        }
    }

    /// Create a failure result.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    /// Create a failure result from an error, keeping its stable code.
    pub fn from_error(error: &DaemonError) -> Self {
        Self::failure(error.code(), error.to_string())
    }
}

/// Execution context for a command.
///
/// The caller is authenticated before a request reaches the engine, so the
/// context carries request metadata only.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// When the request was received.
    pub timestamp: DateTime<Utc>,
    /// The command being executed.
    pub command: String,
}

impl ExecutionContext {
    /// Create a new execution context.
    pub fn new(request_id: Uuid, timestamp: DateTime<Utc>, command: String) -> Self {
        Self {
            request_id,
            timestamp,
            command,
        }
    }

    /// Context for a request received now, with a fresh request id.
    pub fn for_command(command: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4(), Utc::now(), command.into())
    }

    /// Time since the request was received.
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_params_get_string() {
        let params = CommandParams::new(serde_json::json!({
            "name": "test",
            "count": 42
        }));

        assert_eq!(params.get_string("name").unwrap(), "test");
        assert!(params.get_string("missing").is_err());
    }

    #[test]
    fn test_command_params_optional() {
        let params = CommandParams::new(serde_json::json!({
            "name": "test"
        }));

        assert_eq!(params.get_optional_string("name"), Some("test".to_string()));
        assert_eq!(params.get_optional_string("missing"), None);
    }

    #[test]
    fn test_command_result_success() {
        let result = CommandResult::success(serde_json::json!({"key": "value"}));
        assert!(result.success);
        assert!(result.data.is_some());
        assert!(result.error_code.is_none());
    }

    #[test]
    fn test_command_params_require_string() {
        let params = CommandParams::new(serde_json::json!({
            "name": "x",
            "count": 1
        }));

        assert!(params.require_string("name").is_ok());
        assert!(params.require_string("count").is_err());
    }

    #[test]
    fn test_command_result_from_error() {
        let err = DaemonError::remote("Unit foo.service not found.");
        let result = CommandResult::from_error(&err);
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("REMOTE_COMMAND_ERROR"));
        assert!(result
            .error_message
            .unwrap()
            .contains("Unit foo.service not found."));
    }

    #[test]
    fn test_context_for_command() {
        let a = ExecutionContext::for_command("service.list");
        let b = ExecutionContext::for_command("service.list");
        assert_eq!(a.command, "service.list");
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_context_elapsed() {
        let received = Utc::now() - chrono::Duration::seconds(5);
        let ctx = ExecutionContext::new(Uuid::new_v4(), received, "service.list".to_string());
        assert!(ctx.elapsed().num_seconds() >= 5);
        assert!(ExecutionContext::for_command("service.list").elapsed().num_seconds() < 5);
    }

    #[test]
    fn test_command_result_failure() {
        let result = CommandResult::failure("ERR_CODE", "Something failed");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error_code, Some("ERR_CODE".to_string()));
    }
}
