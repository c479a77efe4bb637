//! Workspace (guild) events: settings, membership, and channel creation.

use hearth_domain::chat::{GuildName, GuildVisibility, MemberRemovalReason, Role, UnixTimestamp};
use hearth_domain::dto::Channel;
use hearth_domain::{closed_enum, DomainValidationError};
use hearth_id::{GuildId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_payload, ensure_updated};

closed_enum! {
    pub enum WorkspaceGatewayEventType("event_type") {
        WorkspaceUpdate => "workspace_update",
        WorkspaceMemberAdd => "workspace_member_add",
        WorkspaceMemberUpdate => "workspace_member_update",
        WorkspaceMemberRemove => "workspace_member_remove",
        ChannelCreate => "channel_create",
    }
}

/// Every event type owned by this domain.
pub const WORKSPACE_GATEWAY_EVENT_TYPES: &[&str] = WorkspaceGatewayEventType::WIRE_NAMES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "WorkspaceUpdatedFieldsWire"
)]
pub struct WorkspaceUpdatedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<GuildName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<GuildVisibility>,
}

#[derive(Deserialize)]
struct WorkspaceUpdatedFieldsWire {
    #[serde(default)]
    name: Option<GuildName>,
    #[serde(default)]
    visibility: Option<GuildVisibility>,
}

impl TryFrom<WorkspaceUpdatedFieldsWire> for WorkspaceUpdatedFields {
    type Error = DomainValidationError;

    fn try_from(wire: WorkspaceUpdatedFieldsWire) -> Result<Self, Self::Error> {
        ensure_updated(&[wire.name.is_some(), wire.visibility.is_some()])?;
        Ok(Self {
            name: wire.name,
            visibility: wire.visibility,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceUpdatePayload {
    pub guild_id: GuildId,
    pub updated_fields: WorkspaceUpdatedFields,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceMemberAddPayload {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub role: Role,
    pub joined_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "WorkspaceMemberUpdatedFieldsWire"
)]
pub struct WorkspaceMemberUpdatedFields {
    pub role: Role,
}

#[derive(Deserialize)]
struct WorkspaceMemberUpdatedFieldsWire {
    #[serde(default)]
    role: Option<Role>,
}

impl TryFrom<WorkspaceMemberUpdatedFieldsWire> for WorkspaceMemberUpdatedFields {
    type Error = DomainValidationError;

    fn try_from(wire: WorkspaceMemberUpdatedFieldsWire) -> Result<Self, Self::Error> {
        // Role is the only member field today, so an update without it is empty.
        let role = wire.role.ok_or(DomainValidationError::EmptyUpdate {
            field: "updated_fields",
        })?;
        Ok(Self { role })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceMemberUpdatePayload {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub updated_fields: WorkspaceMemberUpdatedFields,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceMemberRemovePayload {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub reason: MemberRemovalReason,
    pub removed_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ChannelCreatePayload {
    pub guild_id: GuildId,
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorkspaceGatewayEvent {
    WorkspaceUpdate(WorkspaceUpdatePayload),
    WorkspaceMemberAdd(WorkspaceMemberAddPayload),
    WorkspaceMemberUpdate(WorkspaceMemberUpdatePayload),
    WorkspaceMemberRemove(WorkspaceMemberRemovePayload),
    ChannelCreate(ChannelCreatePayload),
}

impl WorkspaceGatewayEvent {
    pub fn event_type(&self) -> WorkspaceGatewayEventType {
        use WorkspaceGatewayEventType as T;
        match self {
            WorkspaceGatewayEvent::WorkspaceUpdate(_) => T::WorkspaceUpdate,
            WorkspaceGatewayEvent::WorkspaceMemberAdd(_) => T::WorkspaceMemberAdd,
            WorkspaceGatewayEvent::WorkspaceMemberUpdate(_) => T::WorkspaceMemberUpdate,
            WorkspaceGatewayEvent::WorkspaceMemberRemove(_) => T::WorkspaceMemberRemove,
            WorkspaceGatewayEvent::ChannelCreate(_) => T::ChannelCreate,
        }
    }
}

/// Handlers for workspace events. Unimplemented methods ignore the event.
pub trait WorkspaceGatewayHandlers {
    fn on_workspace_update(&mut self, _payload: WorkspaceUpdatePayload) {}
    fn on_workspace_member_add(&mut self, _payload: WorkspaceMemberAddPayload) {}
    fn on_workspace_member_update(&mut self, _payload: WorkspaceMemberUpdatePayload) {}
    fn on_workspace_member_remove(&mut self, _payload: WorkspaceMemberRemovePayload) {}
    fn on_channel_create(&mut self, _payload: ChannelCreatePayload) {}
}

fn decode_known(
    event_type: WorkspaceGatewayEventType,
    payload: &Value,
) -> Option<WorkspaceGatewayEvent> {
    use WorkspaceGatewayEventType as T;
    let name = event_type.as_str();
    match event_type {
        T::WorkspaceUpdate => decode_payload(name, payload).map(WorkspaceGatewayEvent::WorkspaceUpdate),
        T::WorkspaceMemberAdd => {
            decode_payload(name, payload).map(WorkspaceGatewayEvent::WorkspaceMemberAdd)
        }
        T::WorkspaceMemberUpdate => {
            decode_payload(name, payload).map(WorkspaceGatewayEvent::WorkspaceMemberUpdate)
        }
        T::WorkspaceMemberRemove => {
            decode_payload(name, payload).map(WorkspaceGatewayEvent::WorkspaceMemberRemove)
        }
        T::ChannelCreate => decode_payload(name, payload).map(WorkspaceGatewayEvent::ChannelCreate),
    }
}

/// Decodes a workspace event; `None` for foreign types or invalid payloads.
pub fn decode_workspace_gateway_event(
    event_type: &str,
    payload: &Value,
) -> Option<WorkspaceGatewayEvent> {
    let event_type = WorkspaceGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a workspace event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_workspace_gateway_event<H>(event_type: &str, payload: &Value, handlers: &mut H) -> bool
where
    H: WorkspaceGatewayHandlers + ?Sized,
{
    let Ok(event_type) = WorkspaceGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(WorkspaceGatewayEvent::WorkspaceUpdate(p)) => handlers.on_workspace_update(p),
        Some(WorkspaceGatewayEvent::WorkspaceMemberAdd(p)) => handlers.on_workspace_member_add(p),
        Some(WorkspaceGatewayEvent::WorkspaceMemberUpdate(p)) => {
            handlers.on_workspace_member_update(p)
        }
        Some(WorkspaceGatewayEvent::WorkspaceMemberRemove(p)) => {
            handlers.on_workspace_member_remove(p)
        }
        Some(WorkspaceGatewayEvent::ChannelCreate(p)) => handlers.on_channel_create(p),
        None => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_domain::chat::ChannelKind;
    use serde_json::json;

    const GUILD: &str = "01HV4Z2WQXKJNM8GPQY6VBKC3D";
    const CHANNEL: &str = "01HV4Z3MXNKPQR9HSTZ7WCMD4E";
    const USER: &str = "01HV4Z5PZQRVST1KVWB9YEMF6G";

    #[test]
    fn test_workspace_update() {
        let payload = json!({
            "guild_id": GUILD,
            "updated_fields": {"visibility": "public"},
            "updated_at_unix": 10
        });
        let event = decode_workspace_gateway_event("workspace_update", &payload).unwrap();
        let WorkspaceGatewayEvent::WorkspaceUpdate(update) = event else {
            panic!("expected workspace_update");
        };
        assert_eq!(update.updated_fields.visibility, Some(GuildVisibility::Public));
        assert!(update.updated_fields.name.is_none());
    }

    #[test]
    fn test_workspace_update_rejects_unknown_visibility_and_empty() {
        let bad = json!({
            "guild_id": GUILD,
            "updated_fields": {"visibility": "hidden"},
            "updated_at_unix": 10
        });
        assert!(decode_workspace_gateway_event("workspace_update", &bad).is_none());
        let empty = json!({"guild_id": GUILD, "updated_fields": {}, "updated_at_unix": 10});
        assert!(decode_workspace_gateway_event("workspace_update", &empty).is_none());
    }

    #[test]
    fn test_member_lifecycle() {
        let add = json!({"guild_id": GUILD, "user_id": USER, "role": "member", "joined_at_unix": 1});
        assert!(decode_workspace_gateway_event("workspace_member_add", &add).is_some());

        let promote = json!({
            "guild_id": GUILD,
            "user_id": USER,
            "updated_fields": {"role": "moderator"},
            "updated_at_unix": 2
        });
        let event = decode_workspace_gateway_event("workspace_member_update", &promote).unwrap();
        let WorkspaceGatewayEvent::WorkspaceMemberUpdate(update) = event else {
            panic!("expected workspace_member_update");
        };
        assert_eq!(update.updated_fields.role, Role::Moderator);

        let remove = json!({"guild_id": GUILD, "user_id": USER, "reason": "ban", "removed_at_unix": 3});
        assert!(decode_workspace_gateway_event("workspace_member_remove", &remove).is_some());
        let bad_reason = json!({"guild_id": GUILD, "user_id": USER, "reason": "rage", "removed_at_unix": 3});
        assert!(decode_workspace_gateway_event("workspace_member_remove", &bad_reason).is_none());
    }

    #[test]
    fn test_channel_create() {
        let payload = json!({
            "guild_id": GUILD,
            "channel": {"channel_id": CHANNEL, "name": "voice-lounge", "kind": "voice"}
        });
        let event = decode_workspace_gateway_event("channel_create", &payload).unwrap();
        let WorkspaceGatewayEvent::ChannelCreate(created) = event else {
            panic!("expected channel_create");
        };
        assert_eq!(created.channel.kind, ChannelKind::Voice);
    }
}
