//! Update model - typed, read-only view of platform payloads.

mod message;
#[allow(clippy::module_inception)]
mod update;
mod user;

pub use message::{Message, COMMAND_KIND, CONTENT_KINDS, PLAIN_KIND};
pub use update::{CallbackQuery, ChosenInlineResult, InlineQuery, Update, UpdateType};
pub use user::{Chat, User};
