//! Message events: create, edit, delete, and reaction counts.

use hearth_domain::chat::{EmojiShortcode, MessageContent, ReactionCount, UnixTimestamp};
use hearth_domain::closed_enum;
use hearth_domain::dto::Message;
use hearth_domain::markdown::MarkdownTokens;
use hearth_domain::DomainValidationError;
use hearth_id::{ChannelId, GuildId, MessageId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_payload, ensure_paired, ensure_updated};

closed_enum! {
    pub enum MessageGatewayEventType("event_type") {
        MessageCreate => "message_create",
        MessageUpdate => "message_update",
        MessageDelete => "message_delete",
        MessageReaction => "message_reaction",
    }
}

/// Every event type owned by this domain.
pub const MESSAGE_GATEWAY_EVENT_TYPES: &[&str] = MessageGatewayEventType::WIRE_NAMES;

/// Fields changed by an edit. Content always travels with its rendered tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "MessageUpdatedFieldsWire"
)]
pub struct MessageUpdatedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_tokens: Option<MarkdownTokens>,
}

#[derive(Deserialize)]
struct MessageUpdatedFieldsWire {
    #[serde(default)]
    content: Option<MessageContent>,
    #[serde(default)]
    markdown_tokens: Option<MarkdownTokens>,
}

impl TryFrom<MessageUpdatedFieldsWire> for MessageUpdatedFields {
    type Error = DomainValidationError;

    fn try_from(wire: MessageUpdatedFieldsWire) -> Result<Self, Self::Error> {
        let has_content = wire.content.is_some();
        let has_tokens = wire.markdown_tokens.is_some();
        ensure_updated(&[has_content, has_tokens])?;
        ensure_paired(
            has_content,
            has_tokens,
            "content and markdown_tokens must change together",
        )?;
        Ok(Self {
            content: wire.content,
            markdown_tokens: wire.markdown_tokens,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MessageUpdatePayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub updated_fields: MessageUpdatedFields,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MessageDeletePayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub deleted_at_unix: UnixTimestamp,
}

/// The current count for one emoji on one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MessageReactionPayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: EmojiShortcode,
    pub count: ReactionCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MessageGatewayEvent {
    MessageCreate(Message),
    MessageUpdate(MessageUpdatePayload),
    MessageDelete(MessageDeletePayload),
    MessageReaction(MessageReactionPayload),
}

impl MessageGatewayEvent {
    pub fn event_type(&self) -> MessageGatewayEventType {
        match self {
            MessageGatewayEvent::MessageCreate(_) => MessageGatewayEventType::MessageCreate,
            MessageGatewayEvent::MessageUpdate(_) => MessageGatewayEventType::MessageUpdate,
            MessageGatewayEvent::MessageDelete(_) => MessageGatewayEventType::MessageDelete,
            MessageGatewayEvent::MessageReaction(_) => MessageGatewayEventType::MessageReaction,
        }
    }
}

/// Handlers for message events. Unimplemented methods ignore the event.
pub trait MessageGatewayHandlers {
    fn on_message_create(&mut self, _message: Message) {}
    fn on_message_update(&mut self, _payload: MessageUpdatePayload) {}
    fn on_message_delete(&mut self, _payload: MessageDeletePayload) {}
    fn on_message_reaction(&mut self, _payload: MessageReactionPayload) {}
}

fn decode_known(event_type: MessageGatewayEventType, payload: &Value) -> Option<MessageGatewayEvent> {
    let name = event_type.as_str();
    match event_type {
        MessageGatewayEventType::MessageCreate => {
            decode_payload(name, payload).map(MessageGatewayEvent::MessageCreate)
        }
        MessageGatewayEventType::MessageUpdate => {
            decode_payload(name, payload).map(MessageGatewayEvent::MessageUpdate)
        }
        MessageGatewayEventType::MessageDelete => {
            decode_payload(name, payload).map(MessageGatewayEvent::MessageDelete)
        }
        MessageGatewayEventType::MessageReaction => {
            decode_payload(name, payload).map(MessageGatewayEvent::MessageReaction)
        }
    }
}

/// Decodes a message event; `None` for foreign types or invalid payloads.
pub fn decode_message_gateway_event(event_type: &str, payload: &Value) -> Option<MessageGatewayEvent> {
    let event_type = MessageGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a message event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_message_gateway_event<H>(event_type: &str, payload: &Value, handlers: &mut H) -> bool
where
    H: MessageGatewayHandlers + ?Sized,
{
    let Ok(event_type) = MessageGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(MessageGatewayEvent::MessageCreate(m)) => handlers.on_message_create(m),
        Some(MessageGatewayEvent::MessageUpdate(p)) => handlers.on_message_update(p),
        Some(MessageGatewayEvent::MessageDelete(p)) => handlers.on_message_delete(p),
        Some(MessageGatewayEvent::MessageReaction(p)) => handlers.on_message_reaction(p),
        None => {}
    }
    true
}
