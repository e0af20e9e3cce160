//! Request payload models for the mutation surface.
//!
//! Ids and permission bitmasks are serialized as strings, matching the wire
//! format the mutation API expects. The structs themselves stay semantic
//! (`u64` ids) so the pipeline and its tests never touch wire encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use derive_new::new;
use serde::{Serialize, Serializer};
use specchio_core::{ChannelKind, ChannelRecord, PermissionGrant, RoleRecord};

fn u64_as_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn opt_u64_as_string<S: Serializer>(
    value: &Option<u64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Voice bitrate applied when the source record carries none.
const DEFAULT_BITRATE: i64 = 64_000;

/// Binary image payload plus the format flag that selects its extension.
#[derive(Debug, Clone, PartialEq, Eq, new, derive_getters::Getters)]
pub struct ImageData {
    /// Raw image bytes as fetched from the CDN.
    bytes: Vec<u8>,
    /// True for gif content, false for png.
    animated: bool,
}

impl ImageData {
    /// A static png payload.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, false)
    }

    /// Encode as the data URI the mutation surface expects for image fields.
    pub fn to_data_uri(&self) -> String {
        let format = if self.animated { "gif" } else { "png" };
        format!(
            "data:image/{format};base64,{}",
            BASE64.encode(&self.bytes)
        )
    }
}

/// A permission overwrite entry on a create-channel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct OverwritePayload {
    /// Target role id.
    #[serde(serialize_with = "u64_as_string")]
    id: u64,
    /// Target kind code; always role — member overwrites never survive
    /// translation.
    #[serde(rename = "type")]
    kind: i64,
    /// Allowed bitmask.
    #[serde(serialize_with = "u64_as_string")]
    allow: u64,
    /// Denied bitmask.
    #[serde(serialize_with = "u64_as_string")]
    deny: u64,
}

impl From<&PermissionGrant> for OverwritePayload {
    fn from(grant: &PermissionGrant) -> Self {
        Self {
            id: *grant.role_id(),
            kind: 0,
            allow: *grant.allow(),
            deny: *grant.deny(),
        }
    }
}

/// Body of a create-role request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new, derive_getters::Getters)]
pub struct CreateRole {
    /// Role name.
    name: String,
    /// Permission bitmask.
    #[serde(serialize_with = "u64_as_string")]
    permissions: u64,
    /// RGB color as a decimal integer.
    color: i64,
    /// Display separately in the member list.
    hoist: bool,
    /// The role can be @mentioned.
    mentionable: bool,
}

impl From<&RoleRecord> for CreateRole {
    fn from(record: &RoleRecord) -> Self {
        Self::new(
            record.name().clone(),
            *record.permissions(),
            *record.color(),
            *record.hoist(),
            *record.mentionable(),
        )
    }
}

/// Body of an edit-role request. Only set fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct EditRole {
    /// New hierarchy position.
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<i64>,
    /// New permission bitmask.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "opt_u64_as_string")]
    permissions: Option<u64>,
}

impl EditRole {
    /// Edit that moves the role to `position`.
    pub fn with_position(position: i64) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Edit that replaces the permission bitmask.
    pub fn with_permissions(permissions: u64) -> Self {
        Self {
            permissions: Some(permissions),
            ..Self::default()
        }
    }
}

/// Body of an edit-channel request. Only set fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct EditChannel {
    /// New sort position.
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<i64>,
}

impl EditChannel {
    /// Edit that moves the channel to `position`.
    pub fn with_position(position: i64) -> Self {
        Self {
            position: Some(position),
        }
    }
}

/// Body of a create-channel request.
///
/// Built from a source [`ChannelRecord`] by [`CreateChannel::from_record`],
/// which selects the kind-specific parameters with a single match on
/// [`ChannelKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct CreateChannel {
    /// Channel name.
    name: String,
    /// Integer type code.
    #[serde(rename = "type")]
    kind: i64,
    /// Parent category id on the target, when resolved.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "opt_u64_as_string")]
    parent_id: Option<u64>,
    /// Sort position.
    position: i64,
    /// Translated permission overwrites.
    permission_overwrites: Vec<OverwritePayload>,
    /// Topic (text-like kinds).
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    /// Age-restricted flag (text kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    nsfw: Option<bool>,
    /// Slowmode interval in seconds (text kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit_per_user: Option<i64>,
    /// Voice bitrate (voice kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    bitrate: Option<i64>,
    /// Voice user limit (voice kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    user_limit: Option<i64>,
}

impl CreateChannel {
    /// A bare category container with its translated overwrites.
    pub fn category(name: impl Into<String>, position: i64, grants: &[PermissionGrant]) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Category.into(),
            parent_id: None,
            position,
            permission_overwrites: grants.iter().map(OverwritePayload::from).collect(),
            topic: None,
            nsfw: None,
            rate_limit_per_user: None,
            bitrate: None,
            user_limit: None,
        }
    }

    /// Build the creation request for a source channel.
    ///
    /// The kind decides which parameters travel: topic/slowmode/nsfw for
    /// text, bitrate/user limit for voice, topic for announcement and forum,
    /// nothing beyond name and parent for stage. Unrecognized kinds fall back
    /// to a plain text channel.
    pub fn from_record(
        record: &ChannelRecord,
        parent: Option<u64>,
        grants: &[PermissionGrant],
    ) -> Self {
        let mut request = Self {
            name: record.name().clone(),
            kind: (*record.kind()).into(),
            parent_id: parent,
            position: *record.position(),
            permission_overwrites: grants.iter().map(OverwritePayload::from).collect(),
            topic: None,
            nsfw: None,
            rate_limit_per_user: None,
            bitrate: None,
            user_limit: None,
        };

        match record.kind() {
            ChannelKind::Text => {
                request.topic = record.topic().clone();
                request.nsfw = Some(*record.nsfw());
                request.rate_limit_per_user = Some(*record.rate_limit_per_user());
            }
            ChannelKind::Voice => {
                request.bitrate = Some(record.bitrate().unwrap_or(DEFAULT_BITRATE));
                request.user_limit = Some(record.user_limit().unwrap_or(0));
            }
            ChannelKind::Announcement | ChannelKind::Forum => {
                request.topic = record.topic().clone();
            }
            ChannelKind::Stage => {}
            ChannelKind::Category | ChannelKind::Other(_) => {
                // Categories never reach this path; unknown kinds are created
                // as plain text channels.
                request.kind = ChannelKind::Text.into();
            }
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specchio_core::ChannelRecordBuilder;

    #[test]
    fn test_image_data_uri_format() {
        let image = ImageData::png(vec![1, 2, 3]);
        assert!(image.to_data_uri().starts_with("data:image/png;base64,"));

        let animated = ImageData::new(vec![1, 2, 3], true);
        assert!(animated.to_data_uri().starts_with("data:image/gif;base64,"));
    }

    #[test]
    fn test_create_role_serializes_bitmask_as_string() {
        let role = CreateRole::new("Moderator".to_string(), 268435456, 3447003, true, false);
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["permissions"], "268435456");
        assert_eq!(json["color"], 3447003);
    }

    #[test]
    fn test_edit_role_omits_unset_fields() {
        let edit = EditRole::with_position(3);
        let json = serde_json::to_value(&edit).unwrap();
        assert_eq!(json["position"], 3);
        assert!(json.get("permissions").is_none());
    }

    #[test]
    fn test_text_channel_request_carries_text_fields() {
        let record = ChannelRecordBuilder::default()
            .id(1u64)
            .kind(specchio_core::ChannelKind::Text)
            .name("general".to_string())
            .topic(Some("chat".to_string()))
            .nsfw(false)
            .rate_limit_per_user(5i64)
            .bitrate(Some(96000))
            .build()
            .unwrap();

        let request = CreateChannel::from_record(&record, Some(9), &[]);
        assert_eq!(*request.topic(), Some("chat".to_string()));
        assert_eq!(*request.rate_limit_per_user(), Some(5));
        // Voice parameters never travel on a text create
        assert_eq!(*request.bitrate(), None);
        assert_eq!(*request.parent_id(), Some(9));
    }

    #[test]
    fn test_voice_channel_request_defaults_bitrate() {
        let record = ChannelRecordBuilder::default()
            .id(2u64)
            .kind(specchio_core::ChannelKind::Voice)
            .name("Voice".to_string())
            .build()
            .unwrap();

        let request = CreateChannel::from_record(&record, None, &[]);
        assert_eq!(*request.bitrate(), Some(64_000));
        assert_eq!(*request.user_limit(), Some(0));
        assert_eq!(*request.topic(), None);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_text() {
        let record = ChannelRecordBuilder::default()
            .id(3u64)
            .kind(specchio_core::ChannelKind::Other(11))
            .name("thread".to_string())
            .build()
            .unwrap();

        let request = CreateChannel::from_record(&record, None, &[]);
        assert_eq!(*request.kind(), 0);
    }

    #[test]
    fn test_channel_request_wire_format() {
        let record = ChannelRecordBuilder::default()
            .id(4u64)
            .kind(specchio_core::ChannelKind::Text)
            .name("general".to_string())
            .build()
            .unwrap();
        let grants = vec![specchio_core::PermissionGrant::new(42, 1024, 0)];

        let request = CreateChannel::from_record(&record, Some(7), &grants);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], 0);
        assert_eq!(json["parent_id"], "7");
        assert_eq!(json["permission_overwrites"][0]["id"], "42");
        assert_eq!(json["permission_overwrites"][0]["allow"], "1024");
        assert_eq!(json["permission_overwrites"][0]["type"], 0);
    }
}
