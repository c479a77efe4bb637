//! Role assignment events: a role granted to or revoked from a member.

use hearth_domain::chat::UnixTimestamp;
use hearth_domain::closed_enum;
use hearth_id::{GuildId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::decode_payload;

closed_enum! {
    pub enum WorkspaceRoleAssignmentGatewayEventType("event_type") {
        WorkspaceRoleAssignmentAdd => "workspace_role_assignment_add",
        WorkspaceRoleAssignmentRemove => "workspace_role_assignment_remove",
    }
}

/// Every event type owned by this domain.
pub const WORKSPACE_ROLE_ASSIGNMENT_GATEWAY_EVENT_TYPES: &[&str] =
    WorkspaceRoleAssignmentGatewayEventType::WIRE_NAMES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceRoleAssignmentAddPayload {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub assigned_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceRoleAssignmentRemovePayload {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub removed_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorkspaceRoleAssignmentGatewayEvent {
    WorkspaceRoleAssignmentAdd(WorkspaceRoleAssignmentAddPayload),
    WorkspaceRoleAssignmentRemove(WorkspaceRoleAssignmentRemovePayload),
}

impl WorkspaceRoleAssignmentGatewayEvent {
    pub fn event_type(&self) -> WorkspaceRoleAssignmentGatewayEventType {
        use WorkspaceRoleAssignmentGatewayEventType as T;
        match self {
            WorkspaceRoleAssignmentGatewayEvent::WorkspaceRoleAssignmentAdd(_) => {
                T::WorkspaceRoleAssignmentAdd
            }
            WorkspaceRoleAssignmentGatewayEvent::WorkspaceRoleAssignmentRemove(_) => {
                T::WorkspaceRoleAssignmentRemove
            }
        }
    }
}

/// Handlers for role assignment events. Unimplemented methods ignore the event.
pub trait WorkspaceRoleAssignmentGatewayHandlers {
    fn on_workspace_role_assignment_add(&mut self, _payload: WorkspaceRoleAssignmentAddPayload) {}
    fn on_workspace_role_assignment_remove(
        &mut self,
        _payload: WorkspaceRoleAssignmentRemovePayload,
    ) {
    }
}

fn decode_known(
    event_type: WorkspaceRoleAssignmentGatewayEventType,
    payload: &Value,
) -> Option<WorkspaceRoleAssignmentGatewayEvent> {
    use WorkspaceRoleAssignmentGatewayEventType as T;
    let name = event_type.as_str();
    match event_type {
        T::WorkspaceRoleAssignmentAdd => decode_payload(name, payload)
            .map(WorkspaceRoleAssignmentGatewayEvent::WorkspaceRoleAssignmentAdd),
        T::WorkspaceRoleAssignmentRemove => decode_payload(name, payload)
            .map(WorkspaceRoleAssignmentGatewayEvent::WorkspaceRoleAssignmentRemove),
    }
}

/// Decodes a role assignment event; `None` for foreign types or invalid payloads.
pub fn decode_workspace_role_assignment_gateway_event(
    event_type: &str,
    payload: &Value,
) -> Option<WorkspaceRoleAssignmentGatewayEvent> {
    let event_type = WorkspaceRoleAssignmentGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a role assignment event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_workspace_role_assignment_gateway_event<H>(
    event_type: &str,
    payload: &Value,
    handlers: &mut H,
) -> bool
where
    H: WorkspaceRoleAssignmentGatewayHandlers + ?Sized,
{
    let Ok(event_type) = WorkspaceRoleAssignmentGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(WorkspaceRoleAssignmentGatewayEvent::WorkspaceRoleAssignmentAdd(p)) => {
            handlers.on_workspace_role_assignment_add(p)
        }
        Some(WorkspaceRoleAssignmentGatewayEvent::WorkspaceRoleAssignmentRemove(p)) => {
            handlers.on_workspace_role_assignment_remove(p)
        }
        None => {}
    }
    true
}
