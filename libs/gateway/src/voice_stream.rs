//! Voice channel events: participant roster, per-participant state, and
//! media stream publication.

use std::collections::HashSet;

use hearth_domain::chat::{MediaPublishSource, UnixTimestamp, VoiceIdentity};
use hearth_domain::{closed_enum, BoundedVec, DomainValidationError};
use hearth_id::{ChannelId, GuildId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_payload, ensure_updated};

/// Most participants carried by one voice roster snapshot.
pub const MAX_VOICE_SYNC_PARTICIPANTS: usize = 512;

closed_enum! {
    pub enum VoiceStreamGatewayEventType("event_type") {
        VoiceParticipantSync => "voice_participant_sync",
        VoiceParticipantJoin => "voice_participant_join",
        VoiceParticipantLeave => "voice_participant_leave",
        VoiceParticipantUpdate => "voice_participant_update",
        VoiceStreamPublish => "voice_stream_publish",
        VoiceStreamUnpublish => "voice_stream_unpublish",
    }
}

/// Every event type owned by this domain.
pub const VOICE_STREAM_GATEWAY_EVENT_TYPES: &[&str] = VoiceStreamGatewayEventType::WIRE_NAMES;

/// One member connected to a voice channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "VoiceParticipantWire"
)]
pub struct VoiceParticipant {
    pub user_id: UserId,
    pub identity: VoiceIdentity,
    pub joined_at_unix: UnixTimestamp,
    pub updated_at_unix: UnixTimestamp,
    pub is_muted: bool,
    pub is_deafened: bool,
    pub is_speaking: bool,
    pub is_video_enabled: bool,
    pub is_screen_share_enabled: bool,
}

#[derive(Deserialize)]
struct VoiceParticipantWire {
    user_id: UserId,
    identity: VoiceIdentity,
    joined_at_unix: UnixTimestamp,
    updated_at_unix: UnixTimestamp,
    is_muted: bool,
    is_deafened: bool,
    is_speaking: bool,
    is_video_enabled: bool,
    is_screen_share_enabled: bool,
}

impl TryFrom<VoiceParticipantWire> for VoiceParticipant {
    type Error = DomainValidationError;

    fn try_from(wire: VoiceParticipantWire) -> Result<Self, Self::Error> {
        if wire.updated_at_unix < wire.joined_at_unix {
            return Err(DomainValidationError::Inconsistent {
                field: "updated_at_unix",
                reason: "participant updated before joining",
            });
        }
        Ok(Self {
            user_id: wire.user_id,
            identity: wire.identity,
            joined_at_unix: wire.joined_at_unix,
            updated_at_unix: wire.updated_at_unix,
            is_muted: wire.is_muted,
            is_deafened: wire.is_deafened,
            is_speaking: wire.is_speaking,
            is_video_enabled: wire.is_video_enabled,
            is_screen_share_enabled: wire.is_screen_share_enabled,
        })
    }
}

/// The full roster of a voice channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "VoiceParticipantSyncWire"
)]
pub struct VoiceParticipantSyncPayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub participants: Vec<VoiceParticipant>,
}

#[derive(Deserialize)]
struct VoiceParticipantSyncWire {
    guild_id: GuildId,
    channel_id: ChannelId,
    participants: BoundedVec<VoiceParticipant, MAX_VOICE_SYNC_PARTICIPANTS>,
}

impl TryFrom<VoiceParticipantSyncWire> for VoiceParticipantSyncPayload {
    type Error = DomainValidationError;

    fn try_from(wire: VoiceParticipantSyncWire) -> Result<Self, Self::Error> {
        // User IDs and media identities are both unique within a channel.
        let mut users = HashSet::with_capacity(wire.participants.len());
        let mut identities = HashSet::with_capacity(wire.participants.len());
        for participant in wire.participants.iter() {
            if !users.insert(participant.user_id) || !identities.insert(&participant.identity) {
                return Err(DomainValidationError::Duplicate {
                    field: "participants",
                });
            }
        }
        Ok(Self {
            guild_id: wire.guild_id,
            channel_id: wire.channel_id,
            participants: wire.participants.into_inner(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct VoiceParticipantJoinPayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub participant: VoiceParticipant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct VoiceParticipantLeavePayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub identity: VoiceIdentity,
    pub left_at_unix: UnixTimestamp,
}

/// Participant flags changed by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "VoiceParticipantUpdatedFieldsWire"
)]
pub struct VoiceParticipantUpdatedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deafened: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_speaking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_video_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_screen_share_enabled: Option<bool>,
}

#[derive(Deserialize)]
struct VoiceParticipantUpdatedFieldsWire {
    #[serde(default)]
    is_muted: Option<bool>,
    #[serde(default)]
    is_deafened: Option<bool>,
    #[serde(default)]
    is_speaking: Option<bool>,
    #[serde(default)]
    is_video_enabled: Option<bool>,
    #[serde(default)]
    is_screen_share_enabled: Option<bool>,
}

impl TryFrom<VoiceParticipantUpdatedFieldsWire> for VoiceParticipantUpdatedFields {
    type Error = DomainValidationError;

    fn try_from(wire: VoiceParticipantUpdatedFieldsWire) -> Result<Self, Self::Error> {
        ensure_updated(&[
            wire.is_muted.is_some(),
            wire.is_deafened.is_some(),
            wire.is_speaking.is_some(),
            wire.is_video_enabled.is_some(),
            wire.is_screen_share_enabled.is_some(),
        ])?;
        Ok(Self {
            is_muted: wire.is_muted,
            is_deafened: wire.is_deafened,
            is_speaking: wire.is_speaking,
            is_video_enabled: wire.is_video_enabled,
            is_screen_share_enabled: wire.is_screen_share_enabled,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct VoiceParticipantUpdatePayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub identity: VoiceIdentity,
    pub updated_fields: VoiceParticipantUpdatedFields,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct VoiceStreamPublishPayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub identity: VoiceIdentity,
    pub stream: MediaPublishSource,
    pub published_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct VoiceStreamUnpublishPayload {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub identity: VoiceIdentity,
    pub stream: MediaPublishSource,
    pub unpublished_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum VoiceStreamGatewayEvent {
    VoiceParticipantSync(VoiceParticipantSyncPayload),
    VoiceParticipantJoin(VoiceParticipantJoinPayload),
    VoiceParticipantLeave(VoiceParticipantLeavePayload),
    VoiceParticipantUpdate(VoiceParticipantUpdatePayload),
    VoiceStreamPublish(VoiceStreamPublishPayload),
    VoiceStreamUnpublish(VoiceStreamUnpublishPayload),
}

impl VoiceStreamGatewayEvent {
    pub fn event_type(&self) -> VoiceStreamGatewayEventType {
        use VoiceStreamGatewayEventType as T;
        match self {
            VoiceStreamGatewayEvent::VoiceParticipantSync(_) => T::VoiceParticipantSync,
            VoiceStreamGatewayEvent::VoiceParticipantJoin(_) => T::VoiceParticipantJoin,
            VoiceStreamGatewayEvent::VoiceParticipantLeave(_) => T::VoiceParticipantLeave,
            VoiceStreamGatewayEvent::VoiceParticipantUpdate(_) => T::VoiceParticipantUpdate,
            VoiceStreamGatewayEvent::VoiceStreamPublish(_) => T::VoiceStreamPublish,
            VoiceStreamGatewayEvent::VoiceStreamUnpublish(_) => T::VoiceStreamUnpublish,
        }
    }
}

/// Handlers for voice events. Unimplemented methods ignore the event.
pub trait VoiceStreamGatewayHandlers {
    fn on_voice_participant_sync(&mut self, _payload: VoiceParticipantSyncPayload) {}
    fn on_voice_participant_join(&mut self, _payload: VoiceParticipantJoinPayload) {}
    fn on_voice_participant_leave(&mut self, _payload: VoiceParticipantLeavePayload) {}
    fn on_voice_participant_update(&mut self, _payload: VoiceParticipantUpdatePayload) {}
    fn on_voice_stream_publish(&mut self, _payload: VoiceStreamPublishPayload) {}
    fn on_voice_stream_unpublish(&mut self, _payload: VoiceStreamUnpublishPayload) {}
}

fn decode_known(
    event_type: VoiceStreamGatewayEventType,
    payload: &Value,
) -> Option<VoiceStreamGatewayEvent> {
    use VoiceStreamGatewayEventType as T;
    let name = event_type.as_str();
    match event_type {
        T::VoiceParticipantSync => {
            decode_payload(name, payload).map(VoiceStreamGatewayEvent::VoiceParticipantSync)
        }
        T::VoiceParticipantJoin => {
            decode_payload(name, payload).map(VoiceStreamGatewayEvent::VoiceParticipantJoin)
        }
        T::VoiceParticipantLeave => {
            decode_payload(name, payload).map(VoiceStreamGatewayEvent::VoiceParticipantLeave)
        }
        T::VoiceParticipantUpdate => {
            decode_payload(name, payload).map(VoiceStreamGatewayEvent::VoiceParticipantUpdate)
        }
        T::VoiceStreamPublish => {
            decode_payload(name, payload).map(VoiceStreamGatewayEvent::VoiceStreamPublish)
        }
        T::VoiceStreamUnpublish => {
            decode_payload(name, payload).map(VoiceStreamGatewayEvent::VoiceStreamUnpublish)
        }
    }
}

/// Decodes a voice event; `None` for foreign types or invalid payloads.
pub fn decode_voice_stream_gateway_event(
    event_type: &str,
    payload: &Value,
) -> Option<VoiceStreamGatewayEvent> {
    let event_type = VoiceStreamGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a voice event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_voice_stream_gateway_event<H>(
    event_type: &str,
    payload: &Value,
    handlers: &mut H,
) -> bool
where
    H: VoiceStreamGatewayHandlers + ?Sized,
{
    let Ok(event_type) = VoiceStreamGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(VoiceStreamGatewayEvent::VoiceParticipantSync(p)) => {
            handlers.on_voice_participant_sync(p)
        }
        Some(VoiceStreamGatewayEvent::VoiceParticipantJoin(p)) => {
            handlers.on_voice_participant_join(p)
        }
        Some(VoiceStreamGatewayEvent::VoiceParticipantLeave(p)) => {
            handlers.on_voice_participant_leave(p)
        }
        Some(VoiceStreamGatewayEvent::VoiceParticipantUpdate(p)) => {
            handlers.on_voice_participant_update(p)
        }
        Some(VoiceStreamGatewayEvent::VoiceStreamPublish(p)) => handlers.on_voice_stream_publish(p),
        Some(VoiceStreamGatewayEvent::VoiceStreamUnpublish(p)) => {
            handlers.on_voice_stream_unpublish(p)
        }
        None => {}
    }
    true
}
