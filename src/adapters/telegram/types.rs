//! Serde types for Bot API responses.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::command::ExecutionResult;

/// Generic Bot API response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Description of a failed call.
    pub fn failure_description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "request failed".to_string())
    }
}

impl From<ApiResponse<Value>> for ExecutionResult {
    fn from(response: ApiResponse<Value>) -> Self {
        ExecutionResult {
            ok: response.ok,
            error_code: response.error_code,
            description: response.description,
            result: response.result,
        }
    }
}
