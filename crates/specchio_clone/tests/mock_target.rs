//! Scripted in-memory target for pipeline tests.
//!
//! Records every mutation the pipeline issues and fails on demand, so tests
//! can assert ordering, translation, and failure tolerance without a
//! network.

use async_trait::async_trait;
use specchio_api::{
    AssetFetcher, CreateChannel, CreateRole, EditChannel, EditRole, ImageData, ResourceSummary,
    TargetInfo, TargetWriter, MANAGE_CHANNELS, MANAGE_ROLES,
};
use specchio_core::PermissionGrant;
use specchio_error::{ApiError, ApiErrorKind, CloneError, CloneErrorKind, SpecchioResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Target guild id reported by preflight.
pub const TARGET_GUILD: u64 = 999;
/// The target's own default role id.
pub const TARGET_DEFAULT_ROLE: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRole {
    pub id: u64,
    pub name: String,
    pub permissions: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCategory {
    pub id: u64,
    pub name: String,
    pub position: i64,
    pub grants: Vec<PermissionGrant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedChannel {
    pub id: u64,
    pub name: String,
    pub kind: i64,
    pub parent: Option<u64>,
    pub position: i64,
    pub grants: Vec<PermissionGrant>,
    pub topic: Option<String>,
    pub bitrate: Option<i64>,
    pub user_limit: Option<i64>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    permissions: u64,
    in_guild: bool,
    fail_creates: HashSet<String>,
    fail_delete_ids: HashSet<u64>,
    fail_icon_fetch: bool,
    fail_emoji_fetch: HashSet<u64>,
    existing_roles: Vec<ResourceSummary>,
    existing_channels: Vec<ResourceSummary>,
    existing_emojis: Vec<ResourceSummary>,

    op_log: Vec<String>,
    mutation_count: usize,
    created_roles: Vec<CreatedRole>,
    created_categories: Vec<CreatedCategory>,
    created_channels: Vec<CreatedChannel>,
    created_emojis: Vec<(String, bool)>,
    role_position_edits: Vec<(u64, i64)>,
    default_role_permission_edits: Vec<u64>,
    channel_position_edits: Vec<(u64, i64)>,
    deleted_roles: Vec<u64>,
    deleted_channels: Vec<u64>,
    deleted_emojis: Vec<u64>,
    guild_name_edits: Vec<String>,
    guild_icon_edits: usize,
}

/// Shared-state mock of the target write surface and the asset fetcher.
#[derive(Debug, Clone)]
pub struct MockTarget {
    state: Arc<Mutex<State>>,
}

fn forbidden() -> specchio_error::SpecchioError {
    ApiError::new(ApiErrorKind::Forbidden).into()
}

impl MockTarget {
    pub fn new() -> Self {
        let state = State {
            next_id: 100,
            permissions: MANAGE_CHANNELS | MANAGE_ROLES,
            in_guild: true,
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    // -- scripting ----------------------------------------------------

    pub fn with_permissions(self, permissions: u64) -> Self {
        self.lock().permissions = permissions;
        self
    }

    pub fn not_in_guild(self) -> Self {
        self.lock().in_guild = false;
        self
    }

    /// Make creation of the named resource fail with `forbidden`.
    pub fn fail_create(self, name: &str) -> Self {
        self.lock().fail_creates.insert(name.to_string());
        self
    }

    /// Make deletion of the given id fail with `forbidden`.
    pub fn fail_delete(self, id: u64) -> Self {
        self.lock().fail_delete_ids.insert(id);
        self
    }

    pub fn fail_icon_fetch(self) -> Self {
        self.lock().fail_icon_fetch = true;
        self
    }

    pub fn fail_emoji_fetch(self, id: u64) -> Self {
        self.lock().fail_emoji_fetch.insert(id);
        self
    }

    pub fn existing_role(self, id: u64, name: &str) -> Self {
        self.lock()
            .existing_roles
            .push(ResourceSummary::new(id, name.to_string()));
        self
    }

    pub fn existing_channel(self, id: u64, name: &str) -> Self {
        self.lock()
            .existing_channels
            .push(ResourceSummary::new(id, name.to_string()));
        self
    }

    pub fn existing_emoji(self, id: u64, name: &str) -> Self {
        self.lock()
            .existing_emojis
            .push(ResourceSummary::new(id, name.to_string()));
        self
    }

    // -- observations -------------------------------------------------

    pub fn op_log(&self) -> Vec<String> {
        self.lock().op_log.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.lock().mutation_count
    }

    pub fn created_roles(&self) -> Vec<CreatedRole> {
        self.lock().created_roles.clone()
    }

    pub fn created_categories(&self) -> Vec<CreatedCategory> {
        self.lock().created_categories.clone()
    }

    pub fn created_channels(&self) -> Vec<CreatedChannel> {
        self.lock().created_channels.clone()
    }

    pub fn created_emojis(&self) -> Vec<(String, bool)> {
        self.lock().created_emojis.clone()
    }

    pub fn role_position_edits(&self) -> Vec<(u64, i64)> {
        self.lock().role_position_edits.clone()
    }

    pub fn default_role_permission_edits(&self) -> Vec<u64> {
        self.lock().default_role_permission_edits.clone()
    }

    pub fn channel_position_edits(&self) -> Vec<(u64, i64)> {
        self.lock().channel_position_edits.clone()
    }

    pub fn deleted_roles(&self) -> Vec<u64> {
        self.lock().deleted_roles.clone()
    }

    pub fn deleted_channels(&self) -> Vec<u64> {
        self.lock().deleted_channels.clone()
    }

    pub fn deleted_emojis(&self) -> Vec<u64> {
        self.lock().deleted_emojis.clone()
    }

    pub fn guild_name_edits(&self) -> Vec<String> {
        self.lock().guild_name_edits.clone()
    }

    pub fn guild_icon_edits(&self) -> usize {
        self.lock().guild_icon_edits
    }
}

impl Default for MockTarget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TargetWriter for MockTarget {
    async fn preflight(&self) -> SpecchioResult<TargetInfo> {
        let state = self.lock();
        if !state.in_guild {
            return Err(CloneError::new(CloneErrorKind::TargetUnreachable(
                "caller is not a member of the target guild".to_string(),
            ))
            .into());
        }
        Ok(TargetInfo::new(
            TARGET_GUILD,
            "target".to_string(),
            TARGET_DEFAULT_ROLE,
            state.permissions,
        ))
    }

    async fn list_roles(&self) -> SpecchioResult<Vec<ResourceSummary>> {
        Ok(self.lock().existing_roles.clone())
    }

    async fn list_channels(&self) -> SpecchioResult<Vec<ResourceSummary>> {
        Ok(self.lock().existing_channels.clone())
    }

    async fn list_emojis(&self) -> SpecchioResult<Vec<ResourceSummary>> {
        Ok(self.lock().existing_emojis.clone())
    }

    async fn edit_guild(
        &self,
        name: Option<&str>,
        icon: Option<&ImageData>,
    ) -> SpecchioResult<()> {
        let mut state = self.lock();
        state.op_log.push("edit_guild".to_string());
        state.mutation_count += 1;
        if let Some(name) = name {
            state.guild_name_edits.push(name.to_string());
        }
        if icon.is_some() {
            state.guild_icon_edits += 1;
        }
        Ok(())
    }

    async fn create_role(&self, request: &CreateRole) -> SpecchioResult<u64> {
        let mut state = self.lock();
        state.op_log.push(format!("create_role {}", request.name()));
        state.mutation_count += 1;
        if state.fail_creates.contains(request.name()) {
            return Err(forbidden());
        }
        let id = state.next_id;
        state.next_id += 1;
        state.created_roles.push(CreatedRole {
            id,
            name: request.name().clone(),
            permissions: *request.permissions(),
        });
        Ok(id)
    }

    async fn edit_role(&self, role_id: u64, edit: &EditRole) -> SpecchioResult<()> {
        let mut state = self.lock();
        state.op_log.push(format!("edit_role {role_id}"));
        state.mutation_count += 1;
        if let Some(position) = edit.position() {
            state.role_position_edits.push((role_id, *position));
        }
        if let Some(permissions) = edit.permissions() {
            if role_id == TARGET_DEFAULT_ROLE {
                state.default_role_permission_edits.push(*permissions);
            }
        }
        Ok(())
    }

    async fn delete_role(&self, role_id: u64) -> SpecchioResult<()> {
        let mut state = self.lock();
        state.op_log.push(format!("delete_role {role_id}"));
        state.mutation_count += 1;
        if state.fail_delete_ids.contains(&role_id) {
            return Err(forbidden());
        }
        state.deleted_roles.push(role_id);
        Ok(())
    }

    async fn create_category(
        &self,
        name: &str,
        position: i64,
        grants: &[PermissionGrant],
    ) -> SpecchioResult<u64> {
        let mut state = self.lock();
        state.op_log.push(format!("create_category {name}"));
        state.mutation_count += 1;
        if state.fail_creates.contains(name) {
            return Err(forbidden());
        }
        let id = state.next_id;
        state.next_id += 1;
        state.created_categories.push(CreatedCategory {
            id,
            name: name.to_string(),
            position,
            grants: grants.to_vec(),
        });
        Ok(id)
    }

    async fn create_channel(&self, request: &CreateChannel) -> SpecchioResult<u64> {
        let mut state = self.lock();
        state
            .op_log
            .push(format!("create_channel {}", request.name()));
        state.mutation_count += 1;
        if state.fail_creates.contains(request.name()) {
            return Err(forbidden());
        }
        let id = state.next_id;
        state.next_id += 1;
        state.created_channels.push(CreatedChannel {
            id,
            name: request.name().clone(),
            kind: *request.kind(),
            parent: *request.parent_id(),
            position: *request.position(),
            grants: request
                .permission_overwrites()
                .iter()
                .map(|ow| PermissionGrant::new(*ow.id(), *ow.allow(), *ow.deny()))
                .collect(),
            topic: request.topic().clone(),
            bitrate: *request.bitrate(),
            user_limit: *request.user_limit(),
        });
        Ok(id)
    }

    async fn edit_channel(&self, channel_id: u64, edit: &EditChannel) -> SpecchioResult<()> {
        let mut state = self.lock();
        state.op_log.push(format!("edit_channel {channel_id}"));
        state.mutation_count += 1;
        if let Some(position) = edit.position() {
            state.channel_position_edits.push((channel_id, *position));
        }
        Ok(())
    }

    async fn delete_channel(&self, channel_id: u64) -> SpecchioResult<()> {
        let mut state = self.lock();
        state.op_log.push(format!("delete_channel {channel_id}"));
        state.mutation_count += 1;
        if state.fail_delete_ids.contains(&channel_id) {
            return Err(forbidden());
        }
        state.deleted_channels.push(channel_id);
        Ok(())
    }

    async fn create_emoji(&self, name: &str, image: &ImageData) -> SpecchioResult<u64> {
        let mut state = self.lock();
        state.op_log.push(format!("create_emoji {name}"));
        state.mutation_count += 1;
        if state.fail_creates.contains(name) {
            return Err(forbidden());
        }
        let id = state.next_id;
        state.next_id += 1;
        state
            .created_emojis
            .push((name.to_string(), *image.animated()));
        Ok(id)
    }

    async fn delete_emoji(&self, emoji_id: u64) -> SpecchioResult<()> {
        let mut state = self.lock();
        state.op_log.push(format!("delete_emoji {emoji_id}"));
        state.mutation_count += 1;
        if state.fail_delete_ids.contains(&emoji_id) {
            return Err(forbidden());
        }
        state.deleted_emojis.push(emoji_id);
        Ok(())
    }
}

#[async_trait]
impl AssetFetcher for MockTarget {
    async fn guild_icon(&self, _guild_id: u64, _hash: &str) -> SpecchioResult<Vec<u8>> {
        if self.lock().fail_icon_fetch {
            return Err(ApiError::new(ApiErrorKind::Status(404)).into());
        }
        Ok(vec![0xAA, 0xBB, 0xCC])
    }

    async fn emoji(&self, emoji_id: u64, _animated: bool) -> SpecchioResult<Vec<u8>> {
        if self.lock().fail_emoji_fetch.contains(&emoji_id) {
            return Err(ApiError::new(ApiErrorKind::Status(404)).into());
        }
        Ok(vec![0x01, 0x02, 0x03])
    }
}
