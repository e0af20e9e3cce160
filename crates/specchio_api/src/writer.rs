//! The mutation surface the replication pipeline drives.

use crate::payloads::{CreateChannel, CreateRole, EditChannel, EditRole, ImageData};
use async_trait::async_trait;
use derive_new::new;
use specchio_core::PermissionGrant;
use specchio_error::SpecchioResult;

/// Permission bit required to manage channels on the target.
pub const MANAGE_CHANNELS: u64 = 1 << 4;

/// Permission bit required to manage roles on the target.
pub const MANAGE_ROLES: u64 = 1 << 28;

/// Target guild facts gathered once during preflight.
#[derive(Debug, Clone, PartialEq, Eq, new, derive_getters::Getters)]
pub struct TargetInfo {
    /// Target guild id.
    guild_id: u64,
    /// Target guild name.
    name: String,
    /// Id of the target's own default role.
    default_role_id: u64,
    /// The caller's permission bitmask on the target.
    permissions: u64,
}

impl TargetInfo {
    /// True when the caller holds both required mutation permissions.
    pub fn can_mutate(&self) -> bool {
        self.permissions & MANAGE_CHANNELS != 0 && self.permissions & MANAGE_ROLES != 0
    }

    /// Names of the required permissions the caller lacks.
    pub fn missing_permissions(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.permissions & MANAGE_CHANNELS == 0 {
            missing.push("manage_channels");
        }
        if self.permissions & MANAGE_ROLES == 0 {
            missing.push("manage_roles");
        }
        missing
    }
}

/// Existing resource on the target, as inventoried for the wipe phase.
#[derive(Debug, Clone, PartialEq, Eq, new, derive_getters::Getters)]
pub struct ResourceSummary {
    /// Resource id.
    id: u64,
    /// Resource name, for log lines.
    name: String,
}

/// Write surface of the target guild.
///
/// One method per mutation kind. Implementations pace every mutation against
/// the shared rate budget and resolve rate limit responses internally, so
/// callers only ever see `{forbidden, malformed-request, generic}` failures.
/// Creation methods return the new resource id on success — the handle the
/// remap table stores.
#[async_trait]
pub trait TargetWriter: Send + Sync {
    /// Reachability and permission facts, fetched once before any mutation.
    async fn preflight(&self) -> SpecchioResult<TargetInfo>;

    /// Existing roles on the target, including the default role.
    async fn list_roles(&self) -> SpecchioResult<Vec<ResourceSummary>>;

    /// Existing channels and categories on the target.
    async fn list_channels(&self) -> SpecchioResult<Vec<ResourceSummary>>;

    /// Existing custom emojis on the target.
    async fn list_emojis(&self) -> SpecchioResult<Vec<ResourceSummary>>;

    /// Edit top-level guild settings. `None` fields are left untouched.
    async fn edit_guild(&self, name: Option<&str>, icon: Option<&ImageData>)
        -> SpecchioResult<()>;

    /// Create a role and return its id.
    async fn create_role(&self, request: &CreateRole) -> SpecchioResult<u64>;

    /// Edit a role (position and/or permissions).
    async fn edit_role(&self, role_id: u64, edit: &EditRole) -> SpecchioResult<()>;

    /// Delete a role.
    async fn delete_role(&self, role_id: u64) -> SpecchioResult<()>;

    /// Create a category container and return its id.
    async fn create_category(
        &self,
        name: &str,
        position: i64,
        grants: &[PermissionGrant],
    ) -> SpecchioResult<u64>;

    /// Create a channel and return its id.
    async fn create_channel(&self, request: &CreateChannel) -> SpecchioResult<u64>;

    /// Edit a channel (position).
    async fn edit_channel(&self, channel_id: u64, edit: &EditChannel) -> SpecchioResult<()>;

    /// Delete a channel or category.
    async fn delete_channel(&self, channel_id: u64) -> SpecchioResult<()>;

    /// Create a custom emoji from a binary payload and return its id.
    async fn create_emoji(&self, name: &str, image: &ImageData) -> SpecchioResult<u64>;

    /// Delete a custom emoji.
    async fn delete_emoji(&self, emoji_id: u64) -> SpecchioResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_mutate_requires_both_bits() {
        let both = TargetInfo::new(1, "t".to_string(), 1, MANAGE_CHANNELS | MANAGE_ROLES);
        assert!(both.can_mutate());
        assert!(both.missing_permissions().is_empty());

        let channels_only = TargetInfo::new(1, "t".to_string(), 1, MANAGE_CHANNELS);
        assert!(!channels_only.can_mutate());
        assert_eq!(channels_only.missing_permissions(), vec!["manage_roles"]);

        let neither = TargetInfo::new(1, "t".to_string(), 1, 0);
        assert_eq!(
            neither.missing_permissions(),
            vec!["manage_channels", "manage_roles"]
        );
    }
}
