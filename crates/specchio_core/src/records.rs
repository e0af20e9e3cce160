//! Wire records for scraped guild documents.
//!
//! These models match the JSON documents returned by the guild, channel,
//! role, and emoji read endpoints. Deserialization is tolerant: ids and
//! bitmasks arrive as strings, and scraped dumps occasionally mangle scalars,
//! so the [`de`](crate::de) helpers coerce rather than reject.

use crate::de;
use crate::kind::{ChannelKind, OverwriteKind};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Well-known name of the default role present in every guild.
///
/// The default role is never deleted or recreated on the target; its
/// permissions are edited in place.
pub const DEFAULT_ROLE_NAME: &str = "@everyone";

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_channel_kind() -> ChannelKind {
    ChannelKind::Text
}

fn default_overwrite_kind() -> OverwriteKind {
    OverwriteKind::Role
}

/// Top-level guild metadata from the source.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters, derive_builder::Builder,
)]
pub struct GuildRecord {
    /// Guild snowflake id.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    id: u64,
    /// Guild name.
    name: String,
    /// Icon hash, used to derive the CDN content URL.
    #[serde(default)]
    #[builder(default)]
    icon: Option<String>,
    /// Guild description.
    #[serde(default)]
    #[builder(default)]
    description: Option<String>,
    /// Approximate member count (present with the counts flag).
    #[serde(default)]
    #[builder(default)]
    approximate_member_count: Option<i64>,
    /// Approximate presence count (present with the counts flag).
    #[serde(default)]
    #[builder(default)]
    approximate_presence_count: Option<i64>,
}

/// A role from the source guild.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters, derive_builder::Builder,
)]
pub struct RoleRecord {
    /// Role snowflake id.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    id: u64,
    /// Role name.
    name: String,
    /// RGB color as a decimal integer, 0 for no color.
    #[serde(default, deserialize_with = "de::i64_or_zero")]
    #[builder(default)]
    color: i64,
    /// Permission bitmask (serialized as a string on the wire).
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    #[builder(default)]
    permissions: u64,
    /// Display the role separately in the member list.
    #[serde(default, deserialize_with = "de::bool_or_false")]
    #[builder(default)]
    hoist: bool,
    /// The role can be @mentioned.
    #[serde(default, deserialize_with = "de::bool_or_false")]
    #[builder(default)]
    mentionable: bool,
    /// Hierarchy position; advisory, reapplied by the reposition pass.
    #[serde(default, deserialize_with = "de::i64_or_zero")]
    #[builder(default)]
    position: i64,
}

impl RoleRecord {
    /// True when this is the default role matched by its well-known name.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_ROLE_NAME
    }
}

/// A permission overwrite attached to a channel or category.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters, derive_builder::Builder,
)]
pub struct OverwriteRecord {
    /// Target kind (role or member).
    #[serde(rename = "type", default = "default_overwrite_kind")]
    #[builder(default = "OverwriteKind::Role")]
    kind: OverwriteKind,
    /// Target id in the source guild.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    id: u64,
    /// Allowed permission bitmask.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    #[builder(default)]
    allow: u64,
    /// Denied permission bitmask.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    #[builder(default)]
    deny: u64,
}

/// A channel (or category) from the source guild.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters, derive_builder::Builder,
)]
pub struct ChannelRecord {
    /// Channel snowflake id.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    id: u64,
    /// Channel kind, decoded from the integer `type` code.
    #[serde(rename = "type", default = "default_channel_kind")]
    kind: ChannelKind,
    /// Channel name.
    #[serde(default = "default_name")]
    name: String,
    /// Parent category id, if the channel lives inside a category.
    #[serde(default, deserialize_with = "de::opt_u64")]
    #[builder(default)]
    parent_id: Option<u64>,
    /// Sort position; advisory.
    #[serde(default, deserialize_with = "de::i64_or_zero")]
    #[builder(default)]
    position: i64,
    /// Permission overwrites on this channel.
    #[serde(default)]
    #[builder(default)]
    permission_overwrites: Vec<OverwriteRecord>,
    /// Channel topic (text-like kinds).
    #[serde(default)]
    #[builder(default)]
    topic: Option<String>,
    /// Age-restricted flag (text-like kinds).
    #[serde(default, deserialize_with = "de::bool_or_false")]
    #[builder(default)]
    nsfw: bool,
    /// Slowmode interval in seconds (text-like kinds).
    #[serde(default, deserialize_with = "de::i64_or_zero")]
    #[builder(default)]
    rate_limit_per_user: i64,
    /// Voice bitrate.
    #[serde(default)]
    #[builder(default)]
    bitrate: Option<i64>,
    /// Voice user limit.
    #[serde(default)]
    #[builder(default)]
    user_limit: Option<i64>,
}

/// A custom emoji from the source guild.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters, derive_builder::Builder,
)]
pub struct EmojiRecord {
    /// Emoji snowflake id; absent entries cannot be fetched from the CDN and
    /// are skipped with a logged error.
    #[serde(default, deserialize_with = "de::opt_u64")]
    #[builder(default)]
    id: Option<u64>,
    /// Emoji name.
    #[serde(default = "default_name")]
    name: String,
    /// True for animated emojis (selects the gif content format).
    #[serde(default, deserialize_with = "de::bool_or_false")]
    #[builder(default)]
    animated: bool,
}

/// A translated permission overwrite, expressed against target role ids.
///
/// Output of overwrite translation, consumed by the write surface as an
/// unordered association from target role to allow/deny bitmask pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new, derive_getters::Getters)]
pub struct PermissionGrant {
    /// Target role id.
    role_id: u64,
    /// Allowed permission bitmask.
    allow: u64,
    /// Denied permission bitmask.
    deny: u64,
}
