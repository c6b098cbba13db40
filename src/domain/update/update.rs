//! The Update entity: one inbound occurrence from the platform.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{UpdateId, UserId};

use super::message::Message;
use super::user::{Chat, User};

/// Discriminated update type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
    ChatJoinRequest,
}

impl UpdateType {
    /// Wire tag of this type, e.g. `edited_message`.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Message => "message",
            UpdateType::EditedMessage => "edited_message",
            UpdateType::ChannelPost => "channel_post",
            UpdateType::EditedChannelPost => "edited_channel_post",
            UpdateType::InlineQuery => "inline_query",
            UpdateType::ChosenInlineResult => "chosen_inline_result",
            UpdateType::CallbackQuery => "callback_query",
            UpdateType::ShippingQuery => "shipping_query",
            UpdateType::PreCheckoutQuery => "pre_checkout_query",
            UpdateType::Poll => "poll",
            UpdateType::PollAnswer => "poll_answer",
            UpdateType::MyChatMember => "my_chat_member",
            UpdateType::ChatMember => "chat_member",
            UpdateType::ChatJoinRequest => "chat_join_request",
        }
    }
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incoming inline query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub query: String,
}

/// The result of an inline query that was chosen by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenInlineResult {
    pub result_id: String,
    pub from: User,
    #[serde(default)]
    pub query: String,
}

/// A callback query from an inline keyboard button press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A Telegram update.
///
/// Immutable once parsed. Sub-objects the dispatcher never inspects are
/// kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: UpdateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_query: Option<InlineQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_inline_result: Option<ChosenInlineResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_query: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_checkout_query: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_chat_member: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_member: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_join_request: Option<Value>,
    #[serde(skip)]
    raw: Value,
}

impl Update {
    /// Parses an update from a JSON document, retaining the raw payload.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_str(payload)?;
        Self::from_value(raw)
    }

    /// Parses an update from an already decoded JSON value.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let mut update: Update = serde_json::from_value(raw.clone())?;
        update.raw = raw;
        Ok(update)
    }

    /// The raw payload this update was parsed from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Type of the first sub-object present, if any is recognized.
    pub fn update_type(&self) -> Option<UpdateType> {
        let present = [
            (self.message.is_some(), UpdateType::Message),
            (self.edited_message.is_some(), UpdateType::EditedMessage),
            (self.channel_post.is_some(), UpdateType::ChannelPost),
            (self.edited_channel_post.is_some(), UpdateType::EditedChannelPost),
            (self.inline_query.is_some(), UpdateType::InlineQuery),
            (self.chosen_inline_result.is_some(), UpdateType::ChosenInlineResult),
            (self.callback_query.is_some(), UpdateType::CallbackQuery),
            (self.shipping_query.is_some(), UpdateType::ShippingQuery),
            (self.pre_checkout_query.is_some(), UpdateType::PreCheckoutQuery),
            (self.poll.is_some(), UpdateType::Poll),
            (self.poll_answer.is_some(), UpdateType::PollAnswer),
            (self.my_chat_member.is_some(), UpdateType::MyChatMember),
            (self.chat_member.is_some(), UpdateType::ChatMember),
            (self.chat_join_request.is_some(), UpdateType::ChatJoinRequest),
        ];
        present
            .into_iter()
            .find_map(|(is_present, kind)| is_present.then_some(kind))
    }

    /// Sender of the update.
    ///
    /// Probes message, edited message, channel post, edited channel post,
    /// inline query, chosen inline result and callback query in that order
    /// and returns the first sender found.
    pub fn sender(&self) -> Option<&User> {
        self.message
            .as_ref()
            .and_then(|m| m.from.as_ref())
            .or_else(|| self.edited_message.as_ref().and_then(|m| m.from.as_ref()))
            .or_else(|| self.channel_post.as_ref().and_then(|m| m.from.as_ref()))
            .or_else(|| self.edited_channel_post.as_ref().and_then(|m| m.from.as_ref()))
            .or_else(|| self.inline_query.as_ref().map(|q| &q.from))
            .or_else(|| self.chosen_inline_result.as_ref().map(|r| &r.from))
            .or_else(|| self.callback_query.as_ref().map(|q| &q.from))
    }

    /// Identity of [`Update::sender`].
    pub fn sender_id(&self) -> Option<UserId> {
        self.sender().map(|u| u.id)
    }

    /// Chat the update happened in, when it has one.
    pub fn chat(&self) -> Option<&Chat> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
            .map(|m| &m.chat)
            .or_else(|| {
                self.callback_query
                    .as_ref()
                    .and_then(|q| q.message.as_ref())
                    .map(|m| &m.chat)
            })
    }

    /// Explicit command token of a message update, without the slash.
    pub fn command_token(&self, bot_username: &str) -> Option<&str> {
        self.message.as_ref()?.command(bot_username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_message_update_and_keeps_raw_payload() {
        let payload = r#"{
            "update_id": 123,
            "message": {
                "message_id": 456,
                "from": {"id": 789, "first_name": "Alice", "is_bot": false},
                "chat": {"id": -100123, "type": "group"},
                "date": 1700000000,
                "text": "/status"
            }
        }"#;
        let update = Update::from_json(payload).unwrap();

        assert_eq!(update.update_id, UpdateId::new(123));
        assert_eq!(update.update_type(), Some(UpdateType::Message));
        assert_eq!(update.command_token("bot"), Some("status"));
        assert_eq!(update.raw()["update_id"], json!(123));
        assert_eq!(update.chat().map(|c| c.id), Some(-100123));
    }

    #[test]
    fn update_type_reports_callback_query() {
        let update = Update::from_value(json!({
            "update_id": 5,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 9, "first_name": "Bo"},
                "data": "approve"
            }
        }))
        .unwrap();

        assert_eq!(update.update_type(), Some(UpdateType::CallbackQuery));
        assert_eq!(update.sender_id().map(|id| id.value()), Some(9));
        assert_eq!(update.command_token("bot"), None);
    }

    #[test]
    fn unknown_update_has_no_type_and_no_sender() {
        let update = Update::from_value(json!({"update_id": 6, "something_new": {}})).unwrap();
        assert_eq!(update.update_type(), None);
        assert!(update.sender().is_none());
    }

    #[test]
    fn sender_prefers_message_over_callback_query() {
        let update = Update::from_value(json!({
            "update_id": 7,
            "message": {
                "message_id": 1,
                "from": {"id": 1, "first_name": "A"},
                "chat": {"id": 1, "type": "private"}
            },
            "callback_query": {"id": "x", "from": {"id": 2, "first_name": "B"}}
        }))
        .unwrap();

        assert_eq!(update.sender_id().map(|id| id.value()), Some(1));
    }

    #[test]
    fn sender_falls_through_to_inline_query() {
        let update = Update::from_value(json!({
            "update_id": 8,
            "inline_query": {"id": "q", "from": {"id": 33, "first_name": "C"}, "query": "cats"}
        }))
        .unwrap();

        assert_eq!(update.update_type(), Some(UpdateType::InlineQuery));
        assert_eq!(update.sender_id().map(|id| id.value()), Some(33));
    }

    #[test]
    fn missing_update_id_is_rejected() {
        assert!(Update::from_json(r#"{"message": {}}"#).is_err());
    }

    #[test]
    fn update_type_tags_are_snake_case() {
        assert_eq!(UpdateType::EditedChannelPost.as_str(), "edited_channel_post");
        assert_eq!(UpdateType::ChosenInlineResult.to_string(), "chosen_inline_result");
    }
}
