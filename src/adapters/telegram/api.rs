//! HTTP client for the Telegram Bot API.
//!
//! Implements the [`BotApi`] port over reqwest for `getUpdates`,
//! `sendMessage`, `setWebhook` and `deleteWebhook`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::domain::command::ExecutionResult;
use crate::domain::foundation::DomainError;
use crate::domain::update::Update;
use crate::ports::{BotApi, GetUpdatesRequest};

use super::types::ApiResponse;

/// Default Bot API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Bot API client.
pub struct TelegramApi {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl TelegramApi {
    /// Create a client for the given bot token.
    pub fn new(token: SecretString) -> Self {
        Self::with_base_url(token, DEFAULT_API_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing or a local Bot API server).
    pub fn with_base_url(token: SecretString, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, DomainError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("{method} request failed: {}", e.without_url())))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| DomainError::transport(format!("{method} response unreadable: {}", e.without_url())))?;

        if !envelope.ok {
            let description = envelope.failure_description();
            warn!(method, error_code = ?envelope.error_code, "{method} failed: {description}");
            let mut err = DomainError::transport(description).with_detail("method", method);
            if let Some(code) = envelope.error_code {
                err = err.with_detail("error_code", code.to_string());
            }
            return Err(err);
        }

        envelope
            .result
            .ok_or_else(|| DomainError::transport(format!("{method} returned no result")))
    }

    async fn call_for_result(&self, method: &str, body: &Value) -> Result<ExecutionResult, DomainError> {
        let result: Value = self.call(method, body).await?;
        Ok(ExecutionResult::empty().with_result(result))
    }
}

#[async_trait]
impl BotApi for TelegramApi {
    async fn get_updates(&self, request: GetUpdatesRequest) -> Result<Vec<Update>, DomainError> {
        let mut body = json!({});
        if let Some(offset) = request.offset {
            body["offset"] = json!(offset);
        }
        if let Some(limit) = request.limit {
            body["limit"] = json!(limit);
        }
        if let Some(timeout) = request.timeout {
            body["timeout"] = json!(timeout);
        }

        let raw: Vec<Value> = self.call("getUpdates", &body).await?;
        debug!(count = raw.len(), "getUpdates returned");

        raw.into_iter()
            .map(|value| {
                Update::from_value(value)
                    .map_err(|e| DomainError::transport(format!("getUpdates returned an invalid update: {e}")))
            })
            .collect()
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<ExecutionResult, DomainError> {
        debug!(chat_id, "sendMessage");
        self.call_for_result("sendMessage", &json!({"chat_id": chat_id, "text": text}))
            .await
    }

    async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<ExecutionResult, DomainError> {
        let mut body = json!({"url": url});
        if let Some(secret) = secret_token {
            body["secret_token"] = json!(secret);
        }
        self.call_for_result("setWebhook", &body).await
    }

    async fn delete_webhook(&self) -> Result<ExecutionResult, DomainError> {
        self.call_for_result("deleteWebhook", &json!({})).await
    }
}
