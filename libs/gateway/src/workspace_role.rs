//! Workspace role events: create, edit, delete, and hierarchy reorder.

use hearth_domain::chat::{PermissionSet, RoleName, UnixTimestamp};
use hearth_domain::dto::WorkspaceRole;
use hearth_domain::{closed_enum, BoundedVec, DomainValidationError};
use hearth_id::{GuildId, RoleId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_payload, ensure_updated};

/// Most role IDs accepted in one reorder.
pub const MAX_REORDER_ROLE_IDS: usize = 64;

closed_enum! {
    pub enum WorkspaceRoleGatewayEventType("event_type") {
        WorkspaceRoleCreate => "workspace_role_create",
        WorkspaceRoleUpdate => "workspace_role_update",
        WorkspaceRoleDelete => "workspace_role_delete",
        WorkspaceRoleReorder => "workspace_role_reorder",
    }
}

/// Every event type owned by this domain.
pub const WORKSPACE_ROLE_GATEWAY_EVENT_TYPES: &[&str] = WorkspaceRoleGatewayEventType::WIRE_NAMES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceRoleCreatePayload {
    pub guild_id: GuildId,
    pub role: WorkspaceRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "WorkspaceRoleUpdatedFieldsWire"
)]
pub struct WorkspaceRoleUpdatedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<RoleName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
}

#[derive(Deserialize)]
struct WorkspaceRoleUpdatedFieldsWire {
    #[serde(default)]
    name: Option<RoleName>,
    #[serde(default)]
    permissions: Option<PermissionSet>,
}

impl TryFrom<WorkspaceRoleUpdatedFieldsWire> for WorkspaceRoleUpdatedFields {
    type Error = DomainValidationError;

    fn try_from(wire: WorkspaceRoleUpdatedFieldsWire) -> Result<Self, Self::Error> {
        ensure_updated(&[wire.name.is_some(), wire.permissions.is_some()])?;
        Ok(Self {
            name: wire.name,
            permissions: wire.permissions,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceRoleUpdatePayload {
    pub guild_id: GuildId,
    pub role_id: RoleId,
    pub updated_fields: WorkspaceRoleUpdatedFields,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceRoleDeletePayload {
    pub guild_id: GuildId,
    pub role_id: RoleId,
    pub deleted_at_unix: UnixTimestamp,
}

/// The new role order, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "WorkspaceRoleReorderWire"
)]
pub struct WorkspaceRoleReorderPayload {
    pub guild_id: GuildId,
    pub role_ids: Vec<RoleId>,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Deserialize)]
struct WorkspaceRoleReorderWire {
    guild_id: GuildId,
    role_ids: BoundedVec<RoleId, MAX_REORDER_ROLE_IDS>,
    updated_at_unix: UnixTimestamp,
}

impl TryFrom<WorkspaceRoleReorderWire> for WorkspaceRoleReorderPayload {
    type Error = DomainValidationError;

    fn try_from(wire: WorkspaceRoleReorderWire) -> Result<Self, Self::Error> {
        wire.role_ids.ensure_unique("role_ids")?;
        Ok(Self {
            guild_id: wire.guild_id,
            role_ids: wire.role_ids.into_inner(),
            updated_at_unix: wire.updated_at_unix,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorkspaceRoleGatewayEvent {
    WorkspaceRoleCreate(WorkspaceRoleCreatePayload),
    WorkspaceRoleUpdate(WorkspaceRoleUpdatePayload),
    WorkspaceRoleDelete(WorkspaceRoleDeletePayload),
    WorkspaceRoleReorder(WorkspaceRoleReorderPayload),
}

impl WorkspaceRoleGatewayEvent {
    pub fn event_type(&self) -> WorkspaceRoleGatewayEventType {
        use WorkspaceRoleGatewayEventType as T;
        match self {
            WorkspaceRoleGatewayEvent::WorkspaceRoleCreate(_) => T::WorkspaceRoleCreate,
            WorkspaceRoleGatewayEvent::WorkspaceRoleUpdate(_) => T::WorkspaceRoleUpdate,
            WorkspaceRoleGatewayEvent::WorkspaceRoleDelete(_) => T::WorkspaceRoleDelete,
            WorkspaceRoleGatewayEvent::WorkspaceRoleReorder(_) => T::WorkspaceRoleReorder,
        }
    }
}

/// Handlers for workspace role events. Unimplemented methods ignore the event.
pub trait WorkspaceRoleGatewayHandlers {
    fn on_workspace_role_create(&mut self, _payload: WorkspaceRoleCreatePayload) {}
    fn on_workspace_role_update(&mut self, _payload: WorkspaceRoleUpdatePayload) {}
    fn on_workspace_role_delete(&mut self, _payload: WorkspaceRoleDeletePayload) {}
    fn on_workspace_role_reorder(&mut self, _payload: WorkspaceRoleReorderPayload) {}
}

fn decode_known(
    event_type: WorkspaceRoleGatewayEventType,
    payload: &Value,
) -> Option<WorkspaceRoleGatewayEvent> {
    use WorkspaceRoleGatewayEventType as T;
    let name = event_type.as_str();
    match event_type {
        T::WorkspaceRoleCreate => {
            decode_payload(name, payload).map(WorkspaceRoleGatewayEvent::WorkspaceRoleCreate)
        }
        T::WorkspaceRoleUpdate => {
            decode_payload(name, payload).map(WorkspaceRoleGatewayEvent::WorkspaceRoleUpdate)
        }
        T::WorkspaceRoleDelete => {
            decode_payload(name, payload).map(WorkspaceRoleGatewayEvent::WorkspaceRoleDelete)
        }
        T::WorkspaceRoleReorder => {
            decode_payload(name, payload).map(WorkspaceRoleGatewayEvent::WorkspaceRoleReorder)
        }
    }
}

/// Decodes a workspace role event; `None` for foreign types or invalid payloads.
pub fn decode_workspace_role_gateway_event(
    event_type: &str,
    payload: &Value,
) -> Option<WorkspaceRoleGatewayEvent> {
    let event_type = WorkspaceRoleGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a workspace role event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_workspace_role_gateway_event<H>(
    event_type: &str,
    payload: &Value,
    handlers: &mut H,
) -> bool
where
    H: WorkspaceRoleGatewayHandlers + ?Sized,
{
    let Ok(event_type) = WorkspaceRoleGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(WorkspaceRoleGatewayEvent::WorkspaceRoleCreate(p)) => {
            handlers.on_workspace_role_create(p)
        }
        Some(WorkspaceRoleGatewayEvent::WorkspaceRoleUpdate(p)) => {
            handlers.on_workspace_role_update(p)
        }
        Some(WorkspaceRoleGatewayEvent::WorkspaceRoleDelete(p)) => {
            handlers.on_workspace_role_delete(p)
        }
        Some(WorkspaceRoleGatewayEvent::WorkspaceRoleReorder(p)) => {
            handlers.on_workspace_role_reorder(p)
        }
        None => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_domain::chat::Permission;
    use serde_json::json;

    const GUILD: &str = "01HV4Z2WQXKJNM8GPQY6VBKC3D";
    const ROLE: &str = "01HV4Z3MXNKPQR9HSTZ7WCMD4E";

    fn reorder(role_ids: Vec<String>) -> Value {
        json!({"guild_id": GUILD, "role_ids": role_ids, "updated_at_unix": 42})
    }

    #[test]
    fn test_reorder_within_cap() {
        let ids: Vec<String> = (0..MAX_REORDER_ROLE_IDS)
            .map(|_| RoleId::new().to_string())
            .collect();
        let event = decode_workspace_role_gateway_event("workspace_role_reorder", &reorder(ids.clone()))
            .unwrap();
        let WorkspaceRoleGatewayEvent::WorkspaceRoleReorder(payload) = event else {
            panic!("expected reorder");
        };
        let decoded: Vec<String> = payload.role_ids.iter().map(ToString::to_string).collect();
        assert_eq!(decoded, ids);
    }

    #[test]
    fn test_reorder_over_cap_rejected() {
        let ids: Vec<String> = (0..=MAX_REORDER_ROLE_IDS)
            .map(|_| RoleId::new().to_string())
            .collect();
        assert_eq!(ids.len(), 65);
        assert!(decode_workspace_role_gateway_event("workspace_role_reorder", &reorder(ids)).is_none());
    }

    #[test]
    fn test_reorder_duplicates_rejected() {
        let ids = vec![ROLE.to_string(), ROLE.to_string()];
        assert!(decode_workspace_role_gateway_event("workspace_role_reorder", &reorder(ids)).is_none());
    }

    #[test]
    fn test_role_create() {
        let payload = json!({
            "guild_id": GUILD,
            "role": {
                "role_id": ROLE,
                "name": "moderators",
                "position": 50,
                "is_system": false,
                "permissions": ["delete_message", "ban_member"]
            }
        });
        let event = decode_workspace_role_gateway_event("workspace_role_create", &payload).unwrap();
        let WorkspaceRoleGatewayEvent::WorkspaceRoleCreate(created) = &event else {
            panic!("expected create");
        };
        assert!(created.role.permissions.contains(Permission::BanMember));
        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(out["payload"]["role"]["isSystem"], false);
        assert_eq!(out["payload"]["role"]["roleId"], ROLE);
    }

    #[test]
    fn test_role_create_rejects_unknown_permission() {
        let payload = json!({
            "guild_id": GUILD,
            "role": {
                "role_id": ROLE,
                "name": "moderators",
                "position": 50,
                "is_system": false,
                "permissions": ["launch_missiles"]
            }
        });
        assert!(decode_workspace_role_gateway_event("workspace_role_create", &payload).is_none());
    }

    #[test]
    fn test_role_update_requires_field() {
        let empty = json!({
            "guild_id": GUILD,
            "role_id": ROLE,
            "updated_fields": {},
            "updated_at_unix": 1
        });
        assert!(decode_workspace_role_gateway_event("workspace_role_update", &empty).is_none());

        let renamed = json!({
            "guild_id": GUILD,
            "role_id": ROLE,
            "updated_fields": {"name": "mods"},
            "updated_at_unix": 1
        });
        assert!(decode_workspace_role_gateway_event("workspace_role_update", &renamed).is_some());
    }
}
