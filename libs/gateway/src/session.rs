//! Session lifecycle events: `ready` and channel subscription acknowledgements.

use hearth_domain::closed_enum;
use hearth_id::{ChannelId, GuildId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::decode_payload;

closed_enum! {
    pub enum SessionGatewayEventType("event_type") {
        Ready => "ready",
        Subscribed => "subscribed",
    }
}

/// Every event type owned by this domain.
pub const SESSION_GATEWAY_EVENT_TYPES: &[&str] = SessionGatewayEventType::WIRE_NAMES;

/// Sent once after the socket authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ReadyPayload {
    pub user_id: UserId,
}

/// Confirms a channel subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SubscribedPayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionGatewayEvent {
    Ready(ReadyPayload),
    Subscribed(SubscribedPayload),
}

impl SessionGatewayEvent {
    pub fn event_type(&self) -> SessionGatewayEventType {
        match self {
            SessionGatewayEvent::Ready(_) => SessionGatewayEventType::Ready,
            SessionGatewayEvent::Subscribed(_) => SessionGatewayEventType::Subscribed,
        }
    }
}

/// Handlers for session events. Unimplemented methods ignore the event.
pub trait SessionGatewayHandlers {
    fn on_ready(&mut self, _payload: ReadyPayload) {}
    fn on_subscribed(&mut self, _payload: SubscribedPayload) {}
}

fn decode_known(event_type: SessionGatewayEventType, payload: &Value) -> Option<SessionGatewayEvent> {
    let name = event_type.as_str();
    match event_type {
        SessionGatewayEventType::Ready => {
            decode_payload(name, payload).map(SessionGatewayEvent::Ready)
        }
        SessionGatewayEventType::Subscribed => {
            decode_payload(name, payload).map(SessionGatewayEvent::Subscribed)
        }
    }
}

/// Decodes a session event; `None` for foreign types or invalid payloads.
pub fn decode_session_gateway_event(event_type: &str, payload: &Value) -> Option<SessionGatewayEvent> {
    let event_type = SessionGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a session event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_session_gateway_event<H>(event_type: &str, payload: &Value, handlers: &mut H) -> bool
where
    H: SessionGatewayHandlers + ?Sized,
{
    let Ok(event_type) = SessionGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(SessionGatewayEvent::Ready(p)) => handlers.on_ready(p),
        Some(SessionGatewayEvent::Subscribed(p)) => handlers.on_subscribed(p),
        None => {}
    }
    true
}
