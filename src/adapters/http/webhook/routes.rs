//! Axum router configuration for the webhook endpoint.

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, receive_update, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `POST {path}` - Receive one update
/// - `GET /health` - Liveness probe
pub fn webhook_router(state: WebhookAppState, path: &str, request_timeout: Duration) -> Router {
    Router::new()
        .route(path, post(receive_update))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
