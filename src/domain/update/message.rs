//! Message sub-object and its content-type detection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::user::{Chat, User};

/// Content fields probed, in order, to determine a message's kind.
///
/// The first present field wins; a `text` field that carries a command
/// for this bot reports as [`COMMAND_KIND`] instead.
pub const CONTENT_KINDS: &[&str] = &[
    "text",
    "audio",
    "animation",
    "document",
    "game",
    "photo",
    "sticker",
    "video",
    "voice",
    "video_note",
    "contact",
    "location",
    "venue",
    "poll",
    "new_chat_members",
    "left_chat_member",
    "new_chat_title",
    "new_chat_photo",
    "delete_chat_photo",
    "group_chat_created",
    "supergroup_chat_created",
    "channel_chat_created",
    "migrate_to_chat_id",
    "migrate_from_chat_id",
    "pinned_message",
    "invoice",
    "successful_payment",
    "connected_website",
    "passport_data",
    "reply_markup",
];

/// Kind reported for a text message that is an explicit command.
pub const COMMAND_KIND: &str = "command";

/// Kind reported when no known content field is present.
pub const PLAIN_KIND: &str = "message";

/// A Telegram message (also used for edited messages and channel posts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Remaining content fields (media, service fields, ...).
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl Message {
    /// The leading `/command[@bot]` token of the text, if any.
    ///
    /// The token ends at the first space or newline.
    pub fn full_command(&self) -> Option<&str> {
        let text = self.text.as_deref()?;
        if !text.starts_with('/') {
            return None;
        }
        let end = text.find([' ', '\n']).unwrap_or(text.len());
        Some(&text[..end])
    }

    /// The command addressed to `bot_username`, without the leading slash.
    ///
    /// `/start@OtherBot` is not a command for this bot and yields `None`.
    pub fn command(&self, bot_username: &str) -> Option<&str> {
        let full = self.full_command()?.strip_prefix('/')?;
        let command = match full.split_once('@') {
            None => full,
            Some((command, target)) if target.eq_ignore_ascii_case(bot_username) => command,
            Some(_) => return None,
        };
        if command.is_empty() {
            None
        } else {
            Some(command)
        }
    }

    /// Text following the command token, trimmed.
    pub fn arguments(&self) -> &str {
        let text = self.text.as_deref().unwrap_or_default();
        match self.full_command() {
            Some(full) => text[full.len()..].trim(),
            None => text.trim(),
        }
    }

    /// Content kind of this message, e.g. `text`, `photo`, `command`.
    pub fn kind(&self, bot_username: &str) -> &'static str {
        let is_command = self.command(bot_username).is_some();
        for kind in CONTENT_KINDS {
            let present = if *kind == "text" {
                self.text.is_some()
            } else {
                self.content.get(*kind).is_some_and(|v| !v.is_null())
            };
            if present {
                return if is_command && *kind == "text" {
                    COMMAND_KIND
                } else {
                    kind
                };
            }
        }
        PLAIN_KIND
    }
}
