//! Presence events: full snapshots and single-user transitions.

use hearth_domain::chat::PresenceStatus;
use hearth_domain::{closed_enum, BoundedVec, DomainValidationError};
use hearth_id::{GuildId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::decode_payload;

/// Most users carried by one presence snapshot.
pub const MAX_PRESENCE_SYNC_USERS: usize = 1024;

closed_enum! {
    pub enum PresenceGatewayEventType("event_type") {
        PresenceSync => "presence_sync",
        PresenceUpdate => "presence_update",
    }
}

/// Every event type owned by this domain.
pub const PRESENCE_GATEWAY_EVENT_TYPES: &[&str] = PresenceGatewayEventType::WIRE_NAMES;

/// The users currently online in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), try_from = "PresenceSyncWire")]
pub struct PresenceSyncPayload {
    pub guild_id: GuildId,
    pub user_ids: Vec<UserId>,
}

#[derive(Deserialize)]
struct PresenceSyncWire {
    guild_id: GuildId,
    user_ids: BoundedVec<UserId, MAX_PRESENCE_SYNC_USERS>,
}

impl TryFrom<PresenceSyncWire> for PresenceSyncPayload {
    type Error = DomainValidationError;

    fn try_from(wire: PresenceSyncWire) -> Result<Self, Self::Error> {
        wire.user_ids.ensure_unique("user_ids")?;
        Ok(Self {
            guild_id: wire.guild_id,
            user_ids: wire.user_ids.into_inner(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PresenceUpdatePayload {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub status: PresenceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PresenceGatewayEvent {
    PresenceSync(PresenceSyncPayload),
    PresenceUpdate(PresenceUpdatePayload),
}

impl PresenceGatewayEvent {
    pub fn event_type(&self) -> PresenceGatewayEventType {
        match self {
            PresenceGatewayEvent::PresenceSync(_) => PresenceGatewayEventType::PresenceSync,
            PresenceGatewayEvent::PresenceUpdate(_) => PresenceGatewayEventType::PresenceUpdate,
        }
    }
}

/// Handlers for presence events. Unimplemented methods ignore the event.
pub trait PresenceGatewayHandlers {
    fn on_presence_sync(&mut self, _payload: PresenceSyncPayload) {}
    fn on_presence_update(&mut self, _payload: PresenceUpdatePayload) {}
}

fn decode_known(event_type: PresenceGatewayEventType, payload: &Value) -> Option<PresenceGatewayEvent> {
    let name = event_type.as_str();
    match event_type {
        PresenceGatewayEventType::PresenceSync => {
            decode_payload(name, payload).map(PresenceGatewayEvent::PresenceSync)
        }
        PresenceGatewayEventType::PresenceUpdate => {
            decode_payload(name, payload).map(PresenceGatewayEvent::PresenceUpdate)
        }
    }
}

/// Decodes a presence event; `None` for foreign types or invalid payloads.
pub fn decode_presence_gateway_event(event_type: &str, payload: &Value) -> Option<PresenceGatewayEvent> {
    let event_type = PresenceGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a presence event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_presence_gateway_event<H>(event_type: &str, payload: &Value, handlers: &mut H) -> bool
where
    H: PresenceGatewayHandlers + ?Sized,
{
    let Ok(event_type) = PresenceGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(PresenceGatewayEvent::PresenceSync(p)) => handlers.on_presence_sync(p),
        Some(PresenceGatewayEvent::PresenceUpdate(p)) => handlers.on_presence_update(p),
        None => {}
    }
    true
}
