//! Profile events for a single user.

use hearth_domain::auth::Username;
use hearth_domain::chat::{AboutMarkdown, AvatarVersion, UnixTimestamp};
use hearth_domain::markdown::MarkdownTokens;
use hearth_domain::{closed_enum, DomainValidationError};
use hearth_id::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_payload, ensure_paired, ensure_updated};

closed_enum! {
    pub enum ProfileGatewayEventType("event_type") {
        ProfileUpdate => "profile_update",
        ProfileAvatarUpdate => "profile_avatar_update",
    }
}

/// Every event type owned by this domain.
pub const PROFILE_GATEWAY_EVENT_TYPES: &[&str] = ProfileGatewayEventType::WIRE_NAMES;

/// Changed profile fields. The about text always travels with its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "ProfileUpdatedFieldsWire"
)]
pub struct ProfileUpdatedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_markdown: Option<AboutMarkdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_markdown_tokens: Option<MarkdownTokens>,
}

#[derive(Deserialize)]
struct ProfileUpdatedFieldsWire {
    #[serde(default)]
    username: Option<Username>,
    #[serde(default)]
    about_markdown: Option<AboutMarkdown>,
    #[serde(default)]
    about_markdown_tokens: Option<MarkdownTokens>,
}

impl TryFrom<ProfileUpdatedFieldsWire> for ProfileUpdatedFields {
    type Error = DomainValidationError;

    fn try_from(wire: ProfileUpdatedFieldsWire) -> Result<Self, Self::Error> {
        let has_about = wire.about_markdown.is_some();
        let has_tokens = wire.about_markdown_tokens.is_some();
        ensure_updated(&[wire.username.is_some(), has_about, has_tokens])?;
        ensure_paired(
            has_about,
            has_tokens,
            "about_markdown and about_markdown_tokens must change together",
        )?;
        Ok(Self {
            username: wire.username,
            about_markdown: wire.about_markdown,
            about_markdown_tokens: wire.about_markdown_tokens,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ProfileUpdatePayload {
    pub user_id: UserId,
    pub updated_fields: ProfileUpdatedFields,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ProfileAvatarUpdatePayload {
    pub user_id: UserId,
    pub avatar_version: AvatarVersion,
    pub updated_at_unix: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ProfileGatewayEvent {
    ProfileUpdate(ProfileUpdatePayload),
    ProfileAvatarUpdate(ProfileAvatarUpdatePayload),
}

impl ProfileGatewayEvent {
    pub fn event_type(&self) -> ProfileGatewayEventType {
        match self {
            ProfileGatewayEvent::ProfileUpdate(_) => ProfileGatewayEventType::ProfileUpdate,
            ProfileGatewayEvent::ProfileAvatarUpdate(_) => {
                ProfileGatewayEventType::ProfileAvatarUpdate
            }
        }
    }
}

/// Handlers for profile events. Unimplemented methods ignore the event.
pub trait ProfileGatewayHandlers {
    fn on_profile_update(&mut self, _payload: ProfileUpdatePayload) {}
    fn on_profile_avatar_update(&mut self, _payload: ProfileAvatarUpdatePayload) {}
}

fn decode_known(event_type: ProfileGatewayEventType, payload: &Value) -> Option<ProfileGatewayEvent> {
    let name = event_type.as_str();
    match event_type {
        ProfileGatewayEventType::ProfileUpdate => {
            decode_payload(name, payload).map(ProfileGatewayEvent::ProfileUpdate)
        }
        ProfileGatewayEventType::ProfileAvatarUpdate => {
            decode_payload(name, payload).map(ProfileGatewayEvent::ProfileAvatarUpdate)
        }
    }
}

/// Decodes a profile event; `None` for foreign types or invalid payloads.
pub fn decode_profile_gateway_event(event_type: &str, payload: &Value) -> Option<ProfileGatewayEvent> {
    let event_type = ProfileGatewayEventType::parse(event_type).ok()?;
    decode_known(event_type, payload)
}

/// Routes a profile event to `handlers`. Returns whether the type belongs to this domain.
pub fn dispatch_profile_gateway_event<H>(event_type: &str, payload: &Value, handlers: &mut H) -> bool
where
    H: ProfileGatewayHandlers + ?Sized,
{
    let Ok(event_type) = ProfileGatewayEventType::parse(event_type) else {
        return false;
    };
    match decode_known(event_type, payload) {
        Some(ProfileGatewayEvent::ProfileUpdate(p)) => handlers.on_profile_update(p),
        Some(ProfileGatewayEvent::ProfileAvatarUpdate(p)) => handlers.on_profile_avatar_update(p),
        None => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const USER: &str = "01HV4Z5PZQRVST1KVWB9YEMF6G";

    fn update(fields: Value) -> Value {
        json!({"user_id": USER, "updated_fields": fields, "updated_at_unix": 1_700_000_000u64})
    }

    #[test]
    fn test_username_only_update() {
        let event =
            decode_profile_gateway_event("profile_update", &update(json!({"username": "ada.l"})))
                .unwrap();
        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(out["payload"]["updatedFields"], json!({"username": "ada.l"}));
        assert_eq!(out["payload"]["userId"], USER);
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(decode_profile_gateway_event("profile_update", &update(json!({}))).is_none());
        assert!(
            decode_profile_gateway_event("profile_update", &update(json!({"username": null})))
                .is_none()
        );
    }

    #[test]
    fn test_about_requires_tokens() {
        let unpaired = update(json!({"about_markdown": "hello"}));
        assert!(decode_profile_gateway_event("profile_update", &unpaired).is_none());

        let paired = update(json!({
            "about_markdown": "hello",
            "about_markdown_tokens": [{"type": "text", "text": "hello"}]
        }));
        assert!(decode_profile_gateway_event("profile_update", &paired).is_some());
    }

    #[test]
    fn test_avatar_update() {
        let payload = json!({"user_id": USER, "avatar_version": 3, "updated_at_unix": 5});
        let event = decode_profile_gateway_event("profile_avatar_update", &payload).unwrap();
        assert_eq!(event.event_type(), ProfileGatewayEventType::ProfileAvatarUpdate);

        let negative = json!({"user_id": USER, "avatar_version": -3, "updated_at_unix": 5});
        assert!(decode_profile_gateway_event("profile_avatar_update", &negative).is_none());
    }
}
