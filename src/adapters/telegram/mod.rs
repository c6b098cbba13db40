//! Telegram Bot API adapter.

mod api;
mod types;

pub use api::{TelegramApi, DEFAULT_API_BASE_URL};
pub use types::ApiResponse;
