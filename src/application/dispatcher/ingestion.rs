//! Ingestion frontends: push (webhook body) and pull (`getUpdates` batch).

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::errors::DispatchError;
use crate::domain::command::ExecutionResult;
use crate::domain::update::Update;
use crate::ports::GetUpdatesRequest;

use super::Dispatcher;

/// Description of the result returned when pulling is refused for lack of a store.
pub const NO_DATABASE_MESSAGE: &str =
    "getUpdates needs a database connection! (enable getupdates_without_database to override)";

impl Dispatcher {
    /// Push frontend: dispatches one raw webhook body.
    ///
    /// Returns the `ok` flag of the cycle's result. Empty or unparsable
    /// bodies are rejected before dispatch.
    pub async fn handle_webhook(&self, body: &[u8]) -> Result<bool, DispatchError> {
        let payload =
            std::str::from_utf8(body).map_err(|e| DispatchError::InvalidPayload(e.to_string()))?;
        if payload.trim().is_empty() {
            return Err(DispatchError::EmptyInput);
        }

        let update =
            Update::from_json(payload).map_err(|e| DispatchError::InvalidPayload(e.to_string()))?;
        let result = self.dispatch(&update).await?;
        Ok(result.is_ok())
    }

    /// Pull frontend: fetches one batch and dispatches it in order.
    ///
    /// Without a connected store this refuses with a non-ok result unless
    /// storeless pulling is enabled. The offset comes from the custom
    /// input, else the store's last recorded id, else the last id seen by
    /// this dispatcher. Storeless runs acknowledge the batch with one extra
    /// fetch. The ok result carries the raw updates processed.
    pub async fn handle_get_updates(
        &self,
        limit: Option<u32>,
        timeout: Option<u64>,
    ) -> Result<ExecutionResult, DispatchError> {
        let store_connected = self.store_connected().await;
        if !store_connected && !self.getupdates_without_database {
            warn!("getUpdates refused without a database connection");
            return Ok(ExecutionResult::failure(NO_DATABASE_MESSAGE));
        }

        let from_custom_input = self.custom_input.is_some();
        let updates = match self.custom_input.as_deref() {
            Some(input) => parse_update_batch(input)?,
            None => self.fetch_batch(store_connected, limit, timeout).await?,
        };

        if !updates.is_empty() {
            info!(count = updates.len(), "processing update batch");
        }

        let mut processed = Vec::with_capacity(updates.len());
        for update in &updates {
            self.dispatch(update).await?;
            processed.push(update.raw().clone());
        }

        if !store_connected && !from_custom_input {
            if let (Some(last), Some(api)) = (updates.last(), self.api.as_ref()) {
                debug!(offset = last.update_id.next_offset(), "acknowledging processed updates");
                let ack = GetUpdatesRequest::new()
                    .with_offset(last.update_id.next_offset())
                    .with_limit(1)
                    .with_timeout(0);
                api.get_updates(ack).await?;
            }
        }

        Ok(ExecutionResult::empty().with_result(Value::Array(processed)))
    }

    async fn fetch_batch(
        &self,
        store_connected: bool,
        limit: Option<u32>,
        timeout: Option<u64>,
    ) -> Result<Vec<Update>, DispatchError> {
        let api = self.api.as_ref().ok_or(DispatchError::TransportNotConfigured)?;

        let recorded = match (&self.store, store_connected) {
            (Some(store), true) => store.last_update_id().await?,
            _ => None,
        };
        let last_id = match recorded {
            Some(id) => Some(id),
            None => self.last_update_id().await,
        };

        let mut request = GetUpdatesRequest::new();
        if let Some(id) = last_id {
            request = request.with_offset(id.next_offset());
        }
        if let Some(limit) = limit {
            request = request.with_limit(limit);
        }
        if let Some(timeout) = timeout {
            request = request.with_timeout(timeout);
        }

        Ok(api.get_updates(request).await?)
    }
}

/// Parses a `getUpdates`-shaped document: `{"ok": true, "result": [...]}` or a bare array.
fn parse_update_batch(input: &str) -> Result<Vec<Update>, DispatchError> {
    let document: Value =
        serde_json::from_str(input).map_err(|e| DispatchError::InvalidPayload(e.to_string()))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut envelope) => {
            if envelope.get("ok") == Some(&Value::Bool(false)) {
                let description = envelope
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("response not ok")
                    .to_string();
                return Err(DispatchError::InvalidPayload(description));
            }
            match envelope.remove("result") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(DispatchError::InvalidPayload(
                        "expected a result array".to_string(),
                    ))
                }
            }
        }
        _ => {
            return Err(DispatchError::InvalidPayload(
                "expected a JSON object or array".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .map(|item| Update::from_value(item).map_err(|e| DispatchError::InvalidPayload(e.to_string())))
        .collect()
}
