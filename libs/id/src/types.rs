//! Typed ID definitions for chat entities.
//!
//! All IDs share the same bare ULID wire format; the type is what keeps them apart.

use crate::define_id;

// =============================================================================
// Accounts
// =============================================================================

define_id!(
    /// Identifies a user account.
    UserId
);

// =============================================================================
// Workspaces
// =============================================================================

define_id!(
    /// Identifies a guild (workspace).
    GuildId
);
define_id!(
    /// Identifies a channel inside a guild.
    ChannelId
);
define_id!(
    /// Identifies a workspace role.
    RoleId
);

// =============================================================================
// Messages
// =============================================================================

define_id!(
    /// Identifies a chat message.
    MessageId
);
define_id!(
    /// Identifies an uploaded attachment.
    AttachmentId
);

// =============================================================================
// Tests
// =============================================================================
