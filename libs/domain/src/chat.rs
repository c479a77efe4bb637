//! Chat scalars and closed sets: names, content, counters, roles and permissions.

use chrono::{DateTime, Utc};
use hearth_id::{AttachmentId, ChannelId, GuildId, MessageId, RoleId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::closed_enum;
use crate::macros::{define_bounded_int, define_text};
use crate::text::{check_label, check_len, check_no_control, check_printable_ascii};
use crate::{id_from_input, DomainValidationError};

/// Largest integer a JavaScript client can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Maximum characters in guild, channel, role and display names.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum characters in a message body.
pub const MAX_MESSAGE_CONTENT_LEN: usize = 2000;

/// Maximum characters in a profile "about" section.
pub const MAX_ABOUT_LEN: usize = 4096;

/// Maximum attachment size in bytes (25 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 25 * 1024 * 1024;

// =============================================================================
// Text
// =============================================================================

fn check_name(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_label(field, s, MAX_NAME_LEN)
}

fn check_message_content(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, 0, MAX_MESSAGE_CONTENT_LEN)
}

fn check_about(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, 0, MAX_ABOUT_LEN)
}

fn check_emoji(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_len(field, s, 1, 32)?;
    if !s
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'+' | b'-'))
    {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must be a lowercase emoji shortcode",
        });
    }
    Ok(())
}

fn check_filename(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_label(field, s, 128)?;
    if s.contains(['/', '\\']) || s == "." || s == ".." {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must not contain path separators",
        });
    }
    Ok(())
}

fn check_mime_type(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_printable_ascii(field, s, 3, 128)?;
    let valid = s.split_once('/').is_some_and(|(kind, subtype)| {
        !kind.is_empty() && !subtype.is_empty() && !subtype.contains('/')
    });
    if !valid {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must look like type/subtype",
        });
    }
    Ok(())
}

fn check_sha256_hex(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    if s.len() != 64 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must be 64 lowercase hex characters",
        });
    }
    Ok(())
}

fn check_voice_identity(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    check_printable_ascii(field, s, 1, 128)
}

define_text!(
    /// Guild (workspace) name.
    GuildName,
    "guild_name",
    check_name
);
define_text!(
    /// Channel name.
    ChannelName,
    "channel_name",
    check_name
);
define_text!(
    /// Workspace role name.
    RoleName,
    "role_name",
    check_name
);
define_text!(
    /// Display name shown next to a user's messages.
    DisplayName,
    "display_name",
    check_name
);
define_text!(
    /// Raw message body (may be empty when attachments carry the message).
    MessageContent,
    "content",
    check_message_content
);
define_text!(
    /// Profile "about" section in markdown source form.
    AboutMarkdown,
    "about_markdown",
    check_about
);
define_text!(
    /// Reaction emoji shortcode, e.g. `thumbs_up`.
    EmojiShortcode,
    "emoji",
    check_emoji
);
define_text!(
    /// Attachment file name, without directories.
    AttachmentFilename,
    "filename",
    check_filename
);
define_text!(MimeType, "mime_type", check_mime_type);
define_text!(Sha256Hex, "sha256_hex", check_sha256_hex);
define_text!(
    /// Participant identity assigned by the media server.
    VoiceIdentity,
    "identity",
    check_voice_identity
);

impl DisplayName {
    /// Returns the name without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }
}

impl MessageContent {
    /// Returns true if the message body has no visible text.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// =============================================================================
// Numbers
// =============================================================================

define_bounded_int!(
    /// Seconds since the Unix epoch; always positive and JavaScript-safe.
    UnixTimestamp,
    "unix_timestamp",
    1,
    MAX_SAFE_INTEGER
);
define_bounded_int!(AttachmentSize, "size_bytes", 0, MAX_ATTACHMENT_BYTES);
define_bounded_int!(
    /// Position in the role hierarchy; higher sorts first.
    RolePosition,
    "position",
    0,
    1000
);
define_bounded_int!(ReactionCount, "count", 0, i32::MAX as u64);
define_bounded_int!(
    /// Monotonic avatar revision, bumped on every upload.
    AvatarVersion,
    "avatar_version",
    0,
    MAX_SAFE_INTEGER
);

impl UnixTimestamp {
    /// Converts to a UTC date-time, if chrono can represent it.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

// =============================================================================
// Closed sets
// =============================================================================

closed_enum! {
    /// A member's standing in a guild.
    pub enum Role("role") {
        Owner => "owner",
        Moderator => "moderator",
        Member => "member",
    }
}

closed_enum! {
    /// Whether a guild appears in the public directory.
    pub enum GuildVisibility("visibility") {
        Private => "private",
        Public => "public",
    }
}

closed_enum! {
    pub enum ChannelKind("kind") {
        Text => "text",
        Voice => "voice",
    }
}

closed_enum! {
    /// A capability granted by a workspace role.
    pub enum Permission("permission") {
        ManageRoles => "manage_roles",
        ManageMemberRoles => "manage_member_roles",
        ManageWorkspace => "manage_workspace",
        ManageChannelContent => "manage_channel_content",
        CreateMessage => "create_message",
        DeleteMessage => "delete_message",
        BanMember => "ban_member",
        ViewAuditLog => "view_audit_log",
        PublishVideo => "publish_video",
        PublishScreenShare => "publish_screen_share",
        SubscribeStreams => "subscribe_streams",
    }
}

closed_enum! {
    pub enum PresenceStatus("status") {
        Online => "online",
        Offline => "offline",
    }
}

closed_enum! {
    /// Track source a voice participant can publish.
    pub enum MediaPublishSource("stream") {
        Microphone => "microphone",
        Camera => "camera",
        ScreenShare => "screen_share",
    }
}

closed_enum! {
    /// Why a member left a guild.
    pub enum MemberRemovalReason("reason") {
        Kick => "kick",
        Ban => "ban",
        Leave => "leave",
    }
}

/// A distinct set of permissions, in the order the server sent them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionSet(Vec<Permission>);

impl PermissionSet {
    /// Validates that no permission appears twice.
    pub fn new(permissions: Vec<Permission>) -> Result<Self, DomainValidationError> {
        if permissions.len() > Permission::ALL.len() {
            return Err(DomainValidationError::TooMany {
                field: "permissions",
                max: Permission::ALL.len(),
                actual: permissions.len(),
            });
        }
        for (i, permission) in permissions.iter().enumerate() {
            if permissions[..i].contains(permission) {
                return Err(DomainValidationError::Duplicate {
                    field: "permissions",
                });
            }
        }
        Ok(Self(permissions))
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let permissions = Vec::<Permission>::deserialize(deserializer)?;
        Self::new(permissions).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Input parsers
// =============================================================================

pub fn guild_id_from_input(raw: &str) -> Result<GuildId, DomainValidationError> {
    id_from_input("guild_id", raw)
}

pub fn channel_id_from_input(raw: &str) -> Result<ChannelId, DomainValidationError> {
    id_from_input("channel_id", raw)
}

pub fn message_id_from_input(raw: &str) -> Result<MessageId, DomainValidationError> {
    id_from_input("message_id", raw)
}

pub fn role_id_from_input(raw: &str) -> Result<RoleId, DomainValidationError> {
    id_from_input("role_id", raw)
}

pub fn attachment_id_from_input(raw: &str) -> Result<AttachmentId, DomainValidationError> {
    id_from_input("attachment_id", raw)
}

pub fn guild_name_from_input(raw: &str) -> Result<GuildName, DomainValidationError> {
    GuildName::parse(raw)
}

pub fn channel_name_from_input(raw: &str) -> Result<ChannelName, DomainValidationError> {
    ChannelName::parse(raw)
}

pub fn role_name_from_input(raw: &str) -> Result<RoleName, DomainValidationError> {
    RoleName::parse(raw)
}

pub fn display_name_from_input(raw: &str) -> Result<DisplayName, DomainValidationError> {
    DisplayName::parse(raw)
}

pub fn message_content_from_input(raw: &str) -> Result<MessageContent, DomainValidationError> {
    MessageContent::parse(raw)
}

pub fn about_markdown_from_input(raw: &str) -> Result<AboutMarkdown, DomainValidationError> {
    AboutMarkdown::parse(raw)
}

pub fn emoji_from_input(raw: &str) -> Result<EmojiShortcode, DomainValidationError> {
    EmojiShortcode::parse(raw)
}

pub fn attachment_filename_from_input(
    raw: &str,
) -> Result<AttachmentFilename, DomainValidationError> {
    AttachmentFilename::parse(raw)
}

pub fn role_from_input(raw: &str) -> Result<Role, DomainValidationError> {
    Role::parse(raw)
}

pub fn guild_visibility_from_input(raw: &str) -> Result<GuildVisibility, DomainValidationError> {
    GuildVisibility::parse(raw)
}

pub fn permission_from_input(raw: &str) -> Result<Permission, DomainValidationError> {
    Permission::parse(raw)
}

pub fn unix_timestamp_from_input(raw: u64) -> Result<UnixTimestamp, DomainValidationError> {
    UnixTimestamp::new(raw)
}

/// Strips surrounding whitespace and rejects control characters, for free-form search input.
pub fn search_query_from_input(raw: &str) -> Result<String, DomainValidationError> {
    let trimmed = raw.trim();
    check_len("query", trimmed, 1, 256)?;
    check_no_control("query", trimmed)?;
    Ok(trimmed.to_string())
}
