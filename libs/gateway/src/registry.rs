//! Cross-domain registry: which domain owns each event type, and
//! whole-gateway decoding and dispatch.
//!
//! Every event type belongs to exactly one domain. Dispatch looks the type
//! up once and hands the event to that domain alone.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use hearth_domain::closed_enum;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{parse_gateway_event_envelope, GatewayEnvelope};
use crate::message::{
    decode_message_gateway_event, dispatch_message_gateway_event, MessageGatewayEvent,
    MessageGatewayHandlers, MESSAGE_GATEWAY_EVENT_TYPES,
};
use crate::presence::{
    decode_presence_gateway_event, dispatch_presence_gateway_event, PresenceGatewayEvent,
    PresenceGatewayHandlers, PRESENCE_GATEWAY_EVENT_TYPES,
};
use crate::profile::{
    decode_profile_gateway_event, dispatch_profile_gateway_event, ProfileGatewayEvent,
    ProfileGatewayHandlers, PROFILE_GATEWAY_EVENT_TYPES,
};
use crate::session::{
    decode_session_gateway_event, dispatch_session_gateway_event, SessionGatewayEvent,
    SessionGatewayHandlers, SESSION_GATEWAY_EVENT_TYPES,
};
use crate::voice_stream::{
    decode_voice_stream_gateway_event, dispatch_voice_stream_gateway_event,
    VoiceStreamGatewayEvent, VoiceStreamGatewayHandlers, VOICE_STREAM_GATEWAY_EVENT_TYPES,
};
use crate::workspace::{
    decode_workspace_gateway_event, dispatch_workspace_gateway_event, WorkspaceGatewayEvent,
    WorkspaceGatewayHandlers, WORKSPACE_GATEWAY_EVENT_TYPES,
};
use crate::workspace_role::{
    decode_workspace_role_gateway_event, dispatch_workspace_role_gateway_event,
    WorkspaceRoleGatewayEvent, WorkspaceRoleGatewayHandlers, WORKSPACE_ROLE_GATEWAY_EVENT_TYPES,
};
use crate::workspace_role_assignment::{
    decode_workspace_role_assignment_gateway_event,
    dispatch_workspace_role_assignment_gateway_event, WorkspaceRoleAssignmentGatewayEvent,
    WorkspaceRoleAssignmentGatewayHandlers, WORKSPACE_ROLE_ASSIGNMENT_GATEWAY_EVENT_TYPES,
};

closed_enum! {
    /// A group of related gateway events with its own decoder.
    pub enum GatewayDomain("gateway_domain") {
        Session => "session",
        Message => "message",
        Presence => "presence",
        Profile => "profile",
        Workspace => "workspace",
        WorkspaceRole => "workspace_role",
        WorkspaceRoleAssignment => "workspace_role_assignment",
        VoiceStream => "voice_stream",
    }
}

impl GatewayDomain {
    /// The event types this domain owns.
    pub fn event_types(&self) -> &'static [&'static str] {
        match self {
            GatewayDomain::Session => SESSION_GATEWAY_EVENT_TYPES,
            GatewayDomain::Message => MESSAGE_GATEWAY_EVENT_TYPES,
            GatewayDomain::Presence => PRESENCE_GATEWAY_EVENT_TYPES,
            GatewayDomain::Profile => PROFILE_GATEWAY_EVENT_TYPES,
            GatewayDomain::Workspace => WORKSPACE_GATEWAY_EVENT_TYPES,
            GatewayDomain::WorkspaceRole => WORKSPACE_ROLE_GATEWAY_EVENT_TYPES,
            GatewayDomain::WorkspaceRoleAssignment => WORKSPACE_ROLE_ASSIGNMENT_GATEWAY_EVENT_TYPES,
            GatewayDomain::VoiceStream => VOICE_STREAM_GATEWAY_EVENT_TYPES,
        }
    }
}

/// Every registered event type with its owning domain, in domain order.
pub fn all_gateway_event_types() -> Vec<(GatewayDomain, &'static str)> {
    GatewayDomain::ALL
        .iter()
        .flat_map(|domain| domain.event_types().iter().map(|t| (*domain, *t)))
        .collect()
}

/// Returns every event type that appears in more than one table (or twice
/// in one), sorted and deduplicated.
pub fn find_duplicate_event_types<'a>(tables: &[&[&'a str]]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<&'a str> = tables
        .iter()
        .flat_map(|table| table.iter().copied())
        .filter(|event_type| !seen.insert(*event_type))
        .collect();
    duplicates.sort_unstable();
    duplicates.dedup();
    duplicates
}

/// Event types registered by more than one domain. Empty in a correct build.
pub fn duplicate_gateway_event_types() -> Vec<&'static str> {
    let tables: Vec<&[&str]> = GatewayDomain::ALL.iter().map(|d| d.event_types()).collect();
    find_duplicate_event_types(&tables)
}

static DOMAIN_BY_EVENT_TYPE: LazyLock<HashMap<&'static str, GatewayDomain>> =
    LazyLock::new(|| all_gateway_event_types().into_iter().map(|(d, t)| (t, d)).collect());

/// Looks up the domain that owns `event_type`.
pub fn domain_for_event_type(event_type: &str) -> Option<GatewayDomain> {
    DOMAIN_BY_EVENT_TYPE.get(event_type).copied()
}

/// A decoded event from any domain.
///
/// Serializes as the inner domain event, `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GatewayEvent {
    Session(SessionGatewayEvent),
    Message(MessageGatewayEvent),
    Presence(PresenceGatewayEvent),
    Profile(ProfileGatewayEvent),
    Workspace(WorkspaceGatewayEvent),
    WorkspaceRole(WorkspaceRoleGatewayEvent),
    WorkspaceRoleAssignment(WorkspaceRoleAssignmentGatewayEvent),
    VoiceStream(VoiceStreamGatewayEvent),
}

impl GatewayEvent {
    pub fn domain(&self) -> GatewayDomain {
        match self {
            GatewayEvent::Session(_) => GatewayDomain::Session,
            GatewayEvent::Message(_) => GatewayDomain::Message,
            GatewayEvent::Presence(_) => GatewayDomain::Presence,
            GatewayEvent::Profile(_) => GatewayDomain::Profile,
            GatewayEvent::Workspace(_) => GatewayDomain::Workspace,
            GatewayEvent::WorkspaceRole(_) => GatewayDomain::WorkspaceRole,
            GatewayEvent::WorkspaceRoleAssignment(_) => GatewayDomain::WorkspaceRoleAssignment,
            GatewayEvent::VoiceStream(_) => GatewayDomain::VoiceStream,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            GatewayEvent::Session(e) => e.event_type().as_str(),
            GatewayEvent::Message(e) => e.event_type().as_str(),
            GatewayEvent::Presence(e) => e.event_type().as_str(),
            GatewayEvent::Profile(e) => e.event_type().as_str(),
            GatewayEvent::Workspace(e) => e.event_type().as_str(),
            GatewayEvent::WorkspaceRole(e) => e.event_type().as_str(),
            GatewayEvent::WorkspaceRoleAssignment(e) => e.event_type().as_str(),
            GatewayEvent::VoiceStream(e) => e.event_type().as_str(),
        }
    }
}

/// Decodes an event from any domain.
///
/// Returns `None` when no domain owns `event_type` or when the owning
/// domain rejects the payload.
pub fn decode_gateway_event(event_type: &str, payload: &Value) -> Option<GatewayEvent> {
    match domain_for_event_type(event_type)? {
        GatewayDomain::Session => {
            decode_session_gateway_event(event_type, payload).map(GatewayEvent::Session)
        }
        GatewayDomain::Message => {
            decode_message_gateway_event(event_type, payload).map(GatewayEvent::Message)
        }
        GatewayDomain::Presence => {
            decode_presence_gateway_event(event_type, payload).map(GatewayEvent::Presence)
        }
        GatewayDomain::Profile => {
            decode_profile_gateway_event(event_type, payload).map(GatewayEvent::Profile)
        }
        GatewayDomain::Workspace => {
            decode_workspace_gateway_event(event_type, payload).map(GatewayEvent::Workspace)
        }
        GatewayDomain::WorkspaceRole => decode_workspace_role_gateway_event(event_type, payload)
            .map(GatewayEvent::WorkspaceRole),
        GatewayDomain::WorkspaceRoleAssignment => {
            decode_workspace_role_assignment_gateway_event(event_type, payload)
                .map(GatewayEvent::WorkspaceRoleAssignment)
        }
        GatewayDomain::VoiceStream => {
            decode_voice_stream_gateway_event(event_type, payload).map(GatewayEvent::VoiceStream)
        }
    }
}

/// Handlers for every gateway domain.
///
/// Implemented automatically for any type that implements all the domain
/// handler traits; implement only the callbacks you care about.
pub trait GatewayEventHandlers:
    SessionGatewayHandlers
    + MessageGatewayHandlers
    + PresenceGatewayHandlers
    + ProfileGatewayHandlers
    + WorkspaceGatewayHandlers
    + WorkspaceRoleGatewayHandlers
    + WorkspaceRoleAssignmentGatewayHandlers
    + VoiceStreamGatewayHandlers
{
}

impl<T> GatewayEventHandlers for T where
    T: SessionGatewayHandlers
        + MessageGatewayHandlers
        + PresenceGatewayHandlers
        + ProfileGatewayHandlers
        + WorkspaceGatewayHandlers
        + WorkspaceRoleGatewayHandlers
        + WorkspaceRoleAssignmentGatewayHandlers
        + VoiceStreamGatewayHandlers
        + ?Sized
{
}

/// Routes an event to the domain that owns its type.
///
/// Returns `true` if some domain owns `event_type`, whether or not the
/// payload was valid. A handler runs only for a valid payload.
pub fn dispatch_gateway_event<H>(event_type: &str, payload: &Value, handlers: &mut H) -> bool
where
    H: GatewayEventHandlers + ?Sized,
{
    let Some(domain) = domain_for_event_type(event_type) else {
        debug!(event_type, "Ignoring unknown gateway event type");
        return false;
    };

    match domain {
        GatewayDomain::Session => dispatch_session_gateway_event(event_type, payload, handlers),
        GatewayDomain::Message => dispatch_message_gateway_event(event_type, payload, handlers),
        GatewayDomain::Presence => dispatch_presence_gateway_event(event_type, payload, handlers),
        GatewayDomain::Profile => dispatch_profile_gateway_event(event_type, payload, handlers),
        GatewayDomain::Workspace => {
            dispatch_workspace_gateway_event(event_type, payload, handlers)
        }
        GatewayDomain::WorkspaceRole => {
            dispatch_workspace_role_gateway_event(event_type, payload, handlers)
        }
        GatewayDomain::WorkspaceRoleAssignment => {
            dispatch_workspace_role_assignment_gateway_event(event_type, payload, handlers)
        }
        GatewayDomain::VoiceStream => {
            dispatch_voice_stream_gateway_event(event_type, payload, handlers)
        }
    }
}

/// Parses a raw frame and dispatches it.
///
/// Returns the envelope if the frame was structurally valid, so callers can
/// inspect `t` even when no domain owns it.
pub fn dispatch_envelope<H>(raw: &str, handlers: &mut H) -> Option<GatewayEnvelope>
where
    H: GatewayEventHandlers + ?Sized,
{
    let envelope = parse_gateway_event_envelope(raw)?;
    dispatch_gateway_event(envelope.event_type(), envelope.payload(), handlers);
    Some(envelope)
}
