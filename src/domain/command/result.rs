//! Outcome of a dispatch cycle or a transport call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured result: success flag, optional error code, description and payload.
///
/// Produced once per dispatch cycle. Mirrors the shape of a Bot API
/// response so transport results and command results read the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ExecutionResult {
    /// Successful result with no payload (no-op acknowledgement).
    pub fn empty() -> Self {
        Self {
            ok: true,
            error_code: None,
            description: None,
            result: None,
        }
    }

    /// Successful result with a description.
    pub fn success(description: impl Into<String>) -> Self {
        Self::empty().with_description(description)
    }

    /// Non-ok result with a description.
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: None,
            description: Some(description.into()),
            result: None,
        }
    }

    /// Non-ok result for an update or command refused by policy.
    pub fn denied() -> Self {
        Self::failure("denied")
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the error code.
    pub fn with_error_code(mut self, code: i64) -> Self {
        self.error_code = Some(code);
        self
    }

    /// Builder: set the typed payload.
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
