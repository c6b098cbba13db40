//! HTTP handlers for the webhook endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use crate::application::{DispatchError, Dispatcher};

use super::dto::{ErrorResponse, WebhookResponse};

/// Header carrying the secret registered with `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state of the webhook endpoint.
#[derive(Clone)]
pub struct WebhookAppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Expected secret token; `None` accepts every request.
    pub secret_token: Option<Arc<SecretString>>,
}

impl WebhookAppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            secret_token: None,
        }
    }

    pub fn with_secret_token(mut self, secret: SecretString) -> Self {
        self.secret_token = Some(Arc::new(secret));
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST handler receiving one update per request.
pub async fn receive_update(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    if let Some(expected) = &state.secret_token {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !validate_secret(expected.expose_secret(), provided) {
            warn!("webhook request with missing or invalid secret token");
            return Err(WebhookApiError::Unauthorized);
        }
    }

    let ok = state.dispatcher.handle_webhook(&body).await?;
    Ok((StatusCode::OK, Json(WebhookResponse { ok })))
}

/// Liveness probe.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Constant-time comparison of the expected and provided secret.
fn validate_secret(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    expected.ct_eq(provided).into()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts dispatch errors to HTTP responses.
pub enum WebhookApiError {
    Unauthorized,
    Dispatch(DispatchError),
}

impl From<DispatchError> for WebhookApiError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            WebhookApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid secret token".to_string(),
            ),
            WebhookApiError::Dispatch(err) if err.is_input_error() => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string())
            }
            WebhookApiError::Dispatch(err) => {
                error!(error = %err, fatal = err.is_fatal(), "webhook dispatch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DISPATCH_FAILED",
                    err.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
