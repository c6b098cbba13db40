//! Identity of the bot this dispatcher serves.

use super::{UserId, ValidationError};

/// Bot username (required) and numeric id (optional until known).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    username: String,
    id: Option<UserId>,
}

impl BotIdentity {
    /// Creates an identity; the username may carry a leading `@`.
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();
        let username = username.trim().trim_start_matches('@').to_string();
        if username.is_empty() {
            return Err(ValidationError::empty_field("bot_username"));
        }
        Ok(Self { username, id: None })
    }

    /// Builder: attach the bot's numeric id.
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }
}
