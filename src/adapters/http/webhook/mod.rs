//! Webhook endpoint - the HTTP side of the push frontend.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, WebhookResponse};
pub use handlers::{WebhookAppState, SECRET_TOKEN_HEADER};
pub use routes::webhook_router;
