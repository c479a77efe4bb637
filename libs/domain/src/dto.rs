//! Structured chat records parsed from REST responses.
//!
//! Every parser is all-or-nothing: one bad field rejects the whole record.
//! Records serialize with camelCase field names for the UI layer.

use hearth_id::{AttachmentId, ChannelId, GuildId, MessageId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Username;
use crate::bounded::BoundedVec;
use crate::chat::{
    AboutMarkdown, AttachmentFilename, AttachmentSize, AvatarVersion, ChannelKind, ChannelName,
    EmojiShortcode, GuildName, GuildVisibility, MessageContent, MimeType, PermissionSet,
    ReactionCount, RoleName, RolePosition, Sha256Hex, UnixTimestamp,
};
use crate::markdown::MarkdownTokens;
use crate::{from_response, DomainValidationError};

/// Caps on list-shaped responses.
pub const MAX_GUILDS: usize = 200;
pub const MAX_CHANNELS: usize = 500;
pub const MAX_ATTACHMENTS_PER_MESSAGE: usize = 5;
pub const MAX_REACTIONS_PER_MESSAGE: usize = 20;
pub const MAX_HISTORY_PAGE: usize = 100;
pub const MAX_WORKSPACE_ROLES: usize = 64;

// =============================================================================
// Guilds and channels
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Guild {
    pub guild_id: GuildId,
    pub name: GuildName,
    pub visibility: GuildVisibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Channel {
    pub channel_id: ChannelId,
    pub name: ChannelName,
    pub kind: ChannelKind,
}

#[derive(Deserialize)]
struct GuildListWire {
    guilds: BoundedVec<Guild, MAX_GUILDS>,
}

#[derive(Deserialize)]
struct ChannelListWire {
    channels: BoundedVec<Channel, MAX_CHANNELS>,
}

pub fn guild_from_response(value: &Value) -> Result<Guild, DomainValidationError> {
    from_response("guild", value)
}

/// Parses `{guilds: [...]}`; guild IDs must be distinct.
pub fn guild_list_from_response(value: &Value) -> Result<Vec<Guild>, DomainValidationError> {
    let wire: GuildListWire = from_response("guild_list", value)?;
    ensure_unique_by("guilds", &wire.guilds, |g| g.guild_id)?;
    Ok(wire.guilds.into_inner())
}

pub fn channel_from_response(value: &Value) -> Result<Channel, DomainValidationError> {
    from_response("channel", value)
}

/// Parses `{channels: [...]}`; channel IDs must be distinct.
pub fn channel_list_from_response(value: &Value) -> Result<Vec<Channel>, DomainValidationError> {
    let wire: ChannelListWire = from_response("channel_list", value)?;
    ensure_unique_by("channels", &wire.channels, |c| c.channel_id)?;
    Ok(wire.channels.into_inner())
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Attachment {
    pub attachment_id: AttachmentId,
    pub guild_id: GuildId,
    pub owner_id: UserId,
    pub filename: AttachmentFilename,
    pub mime_type: MimeType,
    pub size_bytes: AttachmentSize,
    pub sha256_hex: Sha256Hex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Reaction {
    pub emoji: EmojiShortcode,
    pub count: ReactionCount,
    #[serde(default)]
    pub reacted_by_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase"),
    try_from = "MessageWire"
)]
pub struct Message {
    pub message_id: MessageId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: MessageContent,
    pub markdown_tokens: MarkdownTokens,
    pub attachments: Vec<Attachment>,
    pub reactions: Vec<Reaction>,
    pub created_at_unix: UnixTimestamp,
}

#[derive(Deserialize)]
struct MessageWire {
    message_id: MessageId,
    guild_id: GuildId,
    channel_id: ChannelId,
    author_id: UserId,
    content: MessageContent,
    markdown_tokens: MarkdownTokens,
    #[serde(default)]
    attachments: BoundedVec<Attachment, MAX_ATTACHMENTS_PER_MESSAGE>,
    #[serde(default)]
    reactions: BoundedVec<Reaction, MAX_REACTIONS_PER_MESSAGE>,
    created_at_unix: UnixTimestamp,
}

impl TryFrom<MessageWire> for Message {
    type Error = DomainValidationError;

    fn try_from(wire: MessageWire) -> Result<Self, Self::Error> {
        if wire
            .attachments
            .iter()
            .any(|attachment| attachment.guild_id != wire.guild_id)
        {
            return Err(DomainValidationError::Inconsistent {
                field: "attachments",
                reason: "attachment belongs to another guild",
            });
        }
        ensure_unique_by("attachments", &wire.attachments, |a| a.attachment_id)?;
        ensure_unique_by("reactions", &wire.reactions, |r| r.emoji.clone())?;
        if wire.content.is_blank() && wire.attachments.is_empty() {
            return Err(DomainValidationError::InvalidFormat {
                field: "content",
                reason: "message without attachments must have text",
            });
        }

        Ok(Message {
            message_id: wire.message_id,
            guild_id: wire.guild_id,
            channel_id: wire.channel_id,
            author_id: wire.author_id,
            content: wire.content,
            markdown_tokens: wire.markdown_tokens,
            attachments: wire.attachments.into_inner(),
            reactions: wire.reactions.into_inner(),
            created_at_unix: wire.created_at_unix,
        })
    }
}

/// One page of channel history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHistory {
    pub messages: Vec<Message>,
    pub next_before: Option<MessageId>,
}

#[derive(Deserialize)]
struct MessageHistoryWire {
    messages: BoundedVec<Message, MAX_HISTORY_PAGE>,
    #[serde(default)]
    next_before: Option<MessageId>,
}

pub fn attachment_from_response(value: &Value) -> Result<Attachment, DomainValidationError> {
    from_response("attachment", value)
}

pub fn reaction_from_response(value: &Value) -> Result<Reaction, DomainValidationError> {
    from_response("reaction", value)
}

pub fn message_from_response(value: &Value) -> Result<Message, DomainValidationError> {
    from_response("message", value)
}

/// Parses a history page. All messages must share one channel.
pub fn message_history_from_response(
    value: &Value,
) -> Result<MessageHistory, DomainValidationError> {
    let wire: MessageHistoryWire = from_response("message_history", value)?;
    ensure_unique_by("messages", &wire.messages, |m| m.message_id)?;
    if let Some(first) = wire.messages.first() {
        if wire
            .messages
            .iter()
            .any(|m| m.channel_id != first.channel_id || m.guild_id != first.guild_id)
        {
            return Err(DomainValidationError::Inconsistent {
                field: "messages",
                reason: "messages span more than one channel",
            });
        }
    }
    Ok(MessageHistory {
        messages: wire.messages.into_inner(),
        next_before: wire.next_before,
    })
}

// =============================================================================
// Roles and profiles
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WorkspaceRole {
    pub role_id: RoleId,
    pub name: RoleName,
    pub position: RolePosition,
    pub is_system: bool,
    pub permissions: PermissionSet,
}

#[derive(Deserialize)]
struct WorkspaceRoleListWire {
    roles: BoundedVec<WorkspaceRole, MAX_WORKSPACE_ROLES>,
}

pub fn workspace_role_from_response(value: &Value) -> Result<WorkspaceRole, DomainValidationError> {
    from_response("workspace_role", value)
}

/// Parses `{roles: [...]}` sorted by descending position.
pub fn workspace_role_list_from_response(
    value: &Value,
) -> Result<Vec<WorkspaceRole>, DomainValidationError> {
    let wire: WorkspaceRoleListWire = from_response("workspace_role_list", value)?;
    ensure_unique_by("roles", &wire.roles, |r| r.role_id)?;
    let mut roles = wire.roles.into_inner();
    roles.sort_by(|a, b| b.position.cmp(&a.position));
    Ok(roles)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Profile {
    pub user_id: UserId,
    pub username: Username,
    pub about_markdown: AboutMarkdown,
    pub about_markdown_tokens: MarkdownTokens,
    pub avatar_version: AvatarVersion,
}

pub fn profile_from_response(value: &Value) -> Result<Profile, DomainValidationError> {
    from_response("profile", value)
}

fn ensure_unique_by<T, K, F>(field: &'static str, items: &[T], key: F) -> Result<(), DomainValidationError>
where
    K: Eq + std::hash::Hash,
    F: Fn(&T) -> K,
{
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    if items.iter().all(|item| seen.insert(key(item))) {
        Ok(())
    } else {
        Err(DomainValidationError::Duplicate { field })
    }
}
