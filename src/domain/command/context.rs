//! Execution context handed to commands.

use serde_json::Value;

use crate::domain::foundation::{BotIdentity, DomainError};
use crate::domain::update::{Chat, Message, Update};
use crate::ports::{BotApi, UpdateStore};

use super::ExecutionResult;

/// Everything a command may look at while it runs.
///
/// Built by the dispatcher once per cycle; borrows the update being
/// processed and the dispatcher's collaborators.
pub struct CommandContext<'a> {
    update: &'a Update,
    bot: &'a BotIdentity,
    is_admin: bool,
    run_commands: bool,
    config: Option<&'a Value>,
    api: Option<&'a dyn BotApi>,
    store: Option<&'a dyn UpdateStore>,
}

impl<'a> CommandContext<'a> {
    /// Creates a context for an update delivered by the platform.
    pub fn new(update: &'a Update, bot: &'a BotIdentity) -> Self {
        Self {
            update,
            bot,
            is_admin: false,
            run_commands: false,
            config: None,
            api: None,
            store: None,
        }
    }

    /// Builder: whether the sender is privileged.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Builder: mark the cycle as started by `run_commands`.
    pub fn with_run_commands(mut self, run_commands: bool) -> Self {
        self.run_commands = run_commands;
        self
    }

    /// Builder: per-command configuration.
    pub fn with_config(mut self, config: Option<&'a Value>) -> Self {
        self.config = config;
        self
    }

    /// Builder: transport collaborator.
    pub fn with_api(mut self, api: Option<&'a dyn BotApi>) -> Self {
        self.api = api;
        self
    }

    /// Builder: persistence collaborator.
    pub fn with_store(mut self, store: Option<&'a dyn UpdateStore>) -> Self {
        self.store = store;
        self
    }

    pub fn update(&self) -> &'a Update {
        self.update
    }

    pub fn bot(&self) -> &'a BotIdentity {
        self.bot
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// True when the command is executed through `run_commands` rather than an update.
    pub fn is_run_commands(&self) -> bool {
        self.run_commands
    }

    /// Configuration registered for the running command.
    pub fn config(&self) -> Option<&'a Value> {
        self.config
    }

    pub fn api(&self) -> Option<&'a dyn BotApi> {
        self.api
    }

    pub fn store(&self) -> Option<&'a dyn UpdateStore> {
        self.store
    }

    pub fn message(&self) -> Option<&'a Message> {
        self.update.message.as_ref()
    }

    pub fn chat(&self) -> Option<&'a Chat> {
        self.update.chat()
    }

    /// Explicit command token of the current message, if any.
    pub fn command_token(&self) -> Option<&'a str> {
        self.update.command_token(self.bot.username())
    }

    /// Whether a persistence collaborator is present and connected.
    pub async fn store_connected(&self) -> bool {
        match self.store {
            Some(store) => store.is_connected().await,
            None => false,
        }
    }

    /// Send `text` to the chat of the current update.
    ///
    /// Without a transport or a chat there is nobody to reply to and an
    /// empty result is returned.
    pub async fn reply(&self, text: &str) -> Result<ExecutionResult, DomainError> {
        match self.chat() {
            Some(chat) => self.send_to(chat.id, text).await,
            None => Ok(ExecutionResult::empty()),
        }
    }

    /// Send `text` to an arbitrary chat.
    pub async fn send_to(&self, chat_id: i64, text: &str) -> Result<ExecutionResult, DomainError> {
        match self.api {
            Some(api) => api.send_message(chat_id, text).await,
            None => Ok(ExecutionResult::empty()),
        }
    }
}
