//! UpdateClassifier - picks the command name an update is dispatched to.

use crate::domain::command::naming::{command_name_from_type, normalize};
use crate::domain::command::GENERIC_MESSAGE_COMMAND;
use crate::domain::foundation::BotIdentity;
use crate::domain::update::{Update, UpdateType, COMMAND_KIND};

use super::resolver::CommandResolver;

/// Maps an update to a command name.
///
/// Message updates use their explicit command token or a name derived from
/// the content kind (`photo` becomes `Photo`). Other updates derive the name
/// from their type tag (`callback_query` becomes `CallbackQuery`). Names are
/// returned lower-cased.
pub struct UpdateClassifier<'a> {
    bot: &'a BotIdentity,
}

impl<'a> UpdateClassifier<'a> {
    pub fn new(bot: &'a BotIdentity) -> Self {
        Self { bot }
    }

    /// Classifies `update`, probing `resolver` for message updates.
    ///
    /// An explicit command with no handler, or any message whose handler is
    /// fallback-only, is classified as `genericmessage`.
    pub fn classify(&self, update: &Update, resolver: &mut CommandResolver<'_>) -> String {
        match update.update_type() {
            Some(UpdateType::Message) => self.classify_message(update, resolver),
            Some(other) => normalize(&command_name_from_type(other.as_str())),
            None => GENERIC_MESSAGE_COMMAND.to_string(),
        }
    }

    fn classify_message(&self, update: &Update, resolver: &mut CommandResolver<'_>) -> String {
        let Some(message) = update.message.as_ref() else {
            return GENERIC_MESSAGE_COMMAND.to_string();
        };

        let kind = message.kind(self.bot.username());
        let is_command = kind == COMMAND_KIND;
        let name = if is_command {
            message
                .command(self.bot.username())
                .map(normalize)
                .unwrap_or_default()
        } else {
            normalize(&command_name_from_type(kind))
        };

        match resolver.resolve(&name) {
            None if is_command => GENERIC_MESSAGE_COMMAND.to_string(),
            Some(command) if command.is_fallback_only() => GENERIC_MESSAGE_COMMAND.to_string(),
            _ => name,
        }
    }
}
