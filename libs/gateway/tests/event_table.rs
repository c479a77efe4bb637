//! Every registered event type: one valid sample decodes to the camelCase
//! form, and dropping any required top-level key drops the whole event.

use std::collections::BTreeSet;

use hearth_domain::dto::Message;
use hearth_gateway::message::{
    MessageDeletePayload, MessageGatewayHandlers, MessageReactionPayload, MessageUpdatePayload,
};
use hearth_gateway::presence::{
    PresenceGatewayHandlers, PresenceSyncPayload, PresenceUpdatePayload,
};
use hearth_gateway::profile::{
    ProfileAvatarUpdatePayload, ProfileGatewayHandlers, ProfileUpdatePayload,
};
use hearth_gateway::session::{ReadyPayload, SessionGatewayHandlers, SubscribedPayload};
use hearth_gateway::voice_stream::{
    VoiceParticipantJoinPayload, VoiceParticipantLeavePayload, VoiceParticipantSyncPayload,
    VoiceParticipantUpdatePayload, VoiceStreamGatewayHandlers, VoiceStreamPublishPayload,
    VoiceStreamUnpublishPayload,
};
use hearth_gateway::workspace::{
    ChannelCreatePayload, WorkspaceGatewayHandlers, WorkspaceMemberAddPayload,
    WorkspaceMemberRemovePayload, WorkspaceMemberUpdatePayload, WorkspaceUpdatePayload,
};
use hearth_gateway::workspace_role::{
    WorkspaceRoleCreatePayload, WorkspaceRoleDeletePayload, WorkspaceRoleGatewayHandlers,
    WorkspaceRoleReorderPayload, WorkspaceRoleUpdatePayload,
};
use hearth_gateway::workspace_role_assignment::{
    WorkspaceRoleAssignmentAddPayload, WorkspaceRoleAssignmentGatewayHandlers,
    WorkspaceRoleAssignmentRemovePayload,
};
use hearth_gateway::{all_gateway_event_types, decode_gateway_event, dispatch_gateway_event};
use serde_json::{json, Map, Value};

const GUILD: &str = "01HV4Z2WQXKJNM8GPQY6VBKC3D";
const CHANNEL: &str = "01HV4Z3MXNKPQR9HSTZ7WCMD4E";
const MESSAGE: &str = "01HV4Z4NYPQTRS0JTVA8XDME5F";
const USER: &str = "01HV4Z5PZQRVST1KVWB9YEMF6G";
const OTHER_USER: &str = "01HV4Z8S2TVYWX4PYZEC1HQJ9K";
const ROLE: &str = "01HV4Z7R1STXVW3NXYDB0GPH8J";

/// Counts every handler call across all domains.
#[derive(Default)]
struct Counter {
    calls: usize,
}

macro_rules! counting_handlers {
    ($($handlers:ident { $($method:ident($payload:ty)),+ $(,)? })+) => {
        $(
            impl $handlers for Counter {
                $(
                    fn $method(&mut self, _payload: $payload) {
                        self.calls += 1;
                    }
                )+
            }
        )+
    };
}

counting_handlers! {
    SessionGatewayHandlers {
        on_ready(ReadyPayload),
        on_subscribed(SubscribedPayload),
    }
    MessageGatewayHandlers {
        on_message_create(Message),
        on_message_update(MessageUpdatePayload),
        on_message_delete(MessageDeletePayload),
        on_message_reaction(MessageReactionPayload),
    }
    PresenceGatewayHandlers {
        on_presence_sync(PresenceSyncPayload),
        on_presence_update(PresenceUpdatePayload),
    }
    ProfileGatewayHandlers {
        on_profile_update(ProfileUpdatePayload),
        on_profile_avatar_update(ProfileAvatarUpdatePayload),
    }
    WorkspaceGatewayHandlers {
        on_workspace_update(WorkspaceUpdatePayload),
        on_workspace_member_add(WorkspaceMemberAddPayload),
        on_workspace_member_update(WorkspaceMemberUpdatePayload),
        on_workspace_member_remove(WorkspaceMemberRemovePayload),
        on_channel_create(ChannelCreatePayload),
    }
    WorkspaceRoleGatewayHandlers {
        on_workspace_role_create(WorkspaceRoleCreatePayload),
        on_workspace_role_update(WorkspaceRoleUpdatePayload),
        on_workspace_role_delete(WorkspaceRoleDeletePayload),
        on_workspace_role_reorder(WorkspaceRoleReorderPayload),
    }
    WorkspaceRoleAssignmentGatewayHandlers {
        on_workspace_role_assignment_add(WorkspaceRoleAssignmentAddPayload),
        on_workspace_role_assignment_remove(WorkspaceRoleAssignmentRemovePayload),
    }
    VoiceStreamGatewayHandlers {
        on_voice_participant_sync(VoiceParticipantSyncPayload),
        on_voice_participant_join(VoiceParticipantJoinPayload),
        on_voice_participant_leave(VoiceParticipantLeavePayload),
        on_voice_participant_update(VoiceParticipantUpdatePayload),
        on_voice_stream_publish(VoiceStreamPublishPayload),
        on_voice_stream_unpublish(VoiceStreamUnpublishPayload),
    }
}

/// A valid payload for one event type.
struct Sample {
    event_type: &'static str,
    payload: Value,
    /// Top-level keys the decoder fills with a default when absent.
    optional: &'static [&'static str],
}

fn sample(event_type: &'static str, payload: Value) -> Sample {
    Sample {
        event_type,
        payload,
        optional: &[],
    }
}

fn participant() -> Value {
    json!({
        "user_id": USER,
        "identity": "alice.voice",
        "joined_at_unix": 100,
        "updated_at_unix": 120,
        "is_muted": false,
        "is_deafened": false,
        "is_speaking": true,
        "is_video_enabled": false,
        "is_screen_share_enabled": true
    })
}

fn samples() -> Vec<Sample> {
    let text = |s: &str| json!([{"type": "text", "text": s}]);
    vec![
        sample("ready", json!({"user_id": USER})),
        sample("subscribed", json!({"guild_id": GUILD, "channel_id": CHANNEL})),
        Sample {
            event_type: "message_create",
            payload: json!({
                "message_id": MESSAGE,
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "author_id": USER,
                "content": "hello",
                "markdown_tokens": text("hello"),
                "attachments": [],
                "reactions": [{"emoji": "thumbsup", "count": 2, "reacted_by_me": true}],
                "created_at_unix": 1_700_000_000
            }),
            optional: &["attachments", "reactions"],
        },
        sample(
            "message_update",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "message_id": MESSAGE,
                "updated_fields": {"content": "edited", "markdown_tokens": text("edited")},
                "updated_at_unix": 1_700_000_100
            }),
        ),
        sample(
            "message_delete",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "message_id": MESSAGE,
                "deleted_at_unix": 1_700_000_200
            }),
        ),
        sample(
            "message_reaction",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "message_id": MESSAGE,
                "emoji": "thumbsup",
                "count": 3
            }),
        ),
        sample(
            "presence_sync",
            json!({"guild_id": GUILD, "user_ids": [USER, OTHER_USER]}),
        ),
        sample(
            "presence_update",
            json!({"guild_id": GUILD, "user_id": USER, "status": "online"}),
        ),
        sample(
            "profile_update",
            json!({
                "user_id": USER,
                "updated_fields": {
                    "username": "alice_01",
                    "about_markdown": "hi",
                    "about_markdown_tokens": [
                        {"type": "paragraph_start"},
                        {"type": "text", "text": "hi"},
                        {"type": "paragraph_end"}
                    ]
                },
                "updated_at_unix": 7
            }),
        ),
        sample(
            "profile_avatar_update",
            json!({"user_id": USER, "avatar_version": 4, "updated_at_unix": 8}),
        ),
        sample(
            "workspace_update",
            json!({
                "guild_id": GUILD,
                "updated_fields": {"name": "Hearth", "visibility": "public"},
                "updated_at_unix": 9
            }),
        ),
        sample(
            "workspace_member_add",
            json!({"guild_id": GUILD, "user_id": USER, "role": "member", "joined_at_unix": 10}),
        ),
        sample(
            "workspace_member_update",
            json!({
                "guild_id": GUILD,
                "user_id": USER,
                "updated_fields": {"role": "moderator"},
                "updated_at_unix": 11
            }),
        ),
        sample(
            "workspace_member_remove",
            json!({"guild_id": GUILD, "user_id": USER, "reason": "kick", "removed_at_unix": 12}),
        ),
        sample(
            "channel_create",
            json!({
                "guild_id": GUILD,
                "channel": {"channel_id": CHANNEL, "name": "general", "kind": "text"}
            }),
        ),
        sample(
            "workspace_role_create",
            json!({
                "guild_id": GUILD,
                "role": {
                    "role_id": ROLE,
                    "name": "moderators",
                    "position": 50,
                    "is_system": false,
                    "permissions": ["delete_message", "ban_member"]
                }
            }),
        ),
        sample(
            "workspace_role_update",
            json!({
                "guild_id": GUILD,
                "role_id": ROLE,
                "updated_fields": {"name": "mods", "permissions": ["create_message"]},
                "updated_at_unix": 13
            }),
        ),
        sample(
            "workspace_role_delete",
            json!({"guild_id": GUILD, "role_id": ROLE, "deleted_at_unix": 5}),
        ),
        sample(
            "workspace_role_reorder",
            json!({"guild_id": GUILD, "role_ids": [ROLE], "updated_at_unix": 14}),
        ),
        sample(
            "workspace_role_assignment_add",
            json!({"guild_id": GUILD, "user_id": USER, "role_id": ROLE, "assigned_at_unix": 15}),
        ),
        sample(
            "workspace_role_assignment_remove",
            json!({"guild_id": GUILD, "user_id": USER, "role_id": ROLE, "removed_at_unix": 16}),
        ),
        sample(
            "voice_participant_sync",
            json!({"guild_id": GUILD, "channel_id": CHANNEL, "participants": [participant()]}),
        ),
        sample(
            "voice_participant_join",
            json!({"guild_id": GUILD, "channel_id": CHANNEL, "participant": participant()}),
        ),
        sample(
            "voice_participant_leave",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "user_id": USER,
                "identity": "alice.voice",
                "left_at_unix": 130
            }),
        ),
        sample(
            "voice_participant_update",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "user_id": USER,
                "identity": "alice.voice",
                "updated_fields": {"is_muted": true},
                "updated_at_unix": 131
            }),
        ),
        sample(
            "voice_stream_publish",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "user_id": USER,
                "identity": "alice.voice",
                "stream": "camera",
                "published_at_unix": 140
            }),
        ),
        sample(
            "voice_stream_unpublish",
            json!({
                "guild_id": GUILD,
                "channel_id": CHANNEL,
                "user_id": USER,
                "identity": "alice.voice",
                "stream": "camera",
                "unpublished_at_unix": 141
            }),
        ),
    ]
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// The wire payload with every object key renamed to camelCase.
fn camel_case_keys(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (camel_case(k), camel_case_keys(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(camel_case_keys).collect()),
        other => other.clone(),
    }
}

#[test]
fn test_samples_cover_every_registered_type() {
    let registered: BTreeSet<&str> = all_gateway_event_types()
        .into_iter()
        .map(|(_, event_type)| event_type)
        .collect();
    let sampled: BTreeSet<&str> = samples().iter().map(|s| s.event_type).collect();
    assert_eq!(registered, sampled);
}

#[test]
fn test_camel_case() {
    assert_eq!(camel_case("is_screen_share_enabled"), "isScreenShareEnabled");
    assert_eq!(camel_case("sha256_hex"), "sha256Hex");
    assert_eq!(camel_case("ordered"), "ordered");
}

#[test]
fn test_valid_sample_decodes_to_camel_case() {
    for sample in samples() {
        let event = decode_gateway_event(sample.event_type, &sample.payload)
            .unwrap_or_else(|| panic!("{} sample did not decode", sample.event_type));
        assert_eq!(event.event_type(), sample.event_type);

        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(
            out,
            json!({"type": sample.event_type, "payload": camel_case_keys(&sample.payload)}),
            "{}",
            sample.event_type
        );

        let mut counter = Counter::default();
        assert!(dispatch_gateway_event(sample.event_type, &sample.payload, &mut counter));
        assert_eq!(counter.calls, 1, "{}", sample.event_type);
    }
}

#[test]
fn test_missing_required_key_drops_event() {
    for sample in samples() {
        let Value::Object(fields) = &sample.payload else {
            panic!("{} sample is not an object", sample.event_type);
        };
        for key in fields.keys() {
            if sample.optional.contains(&key.as_str()) {
                continue;
            }
            let mut partial = fields.clone();
            partial.remove(key);
            let partial = Value::Object(partial);

            assert!(
                decode_gateway_event(sample.event_type, &partial).is_none(),
                "{} decoded without {key}",
                sample.event_type
            );

            let mut counter = Counter::default();
            assert!(dispatch_gateway_event(sample.event_type, &partial, &mut counter));
            assert_eq!(counter.calls, 0, "{} handler ran without {key}", sample.event_type);
        }
    }
}

#[test]
fn test_optional_keys_default_when_absent() {
    for sample in samples().into_iter().filter(|s| !s.optional.is_empty()) {
        let Value::Object(mut fields) = sample.payload else {
            panic!("{} sample is not an object", sample.event_type);
        };
        for key in sample.optional {
            fields.remove(*key);
        }
        assert!(decode_gateway_event(sample.event_type, &Value::Object(fields)).is_some());
    }
}
