//! The phase-ordered replication pipeline.

use crate::policy::{on_failure, OnFailure, Operation};
use crate::translate::OverwriteTranslator;
use derive_new::new;
use specchio_api::{
    AssetFetcher, CreateChannel, CreateRole, EditChannel, EditRole, ImageData, TargetInfo,
    TargetWriter,
};
use specchio_core::{
    ChannelRecord, GuildRecord, PhaseSummary, ProgressTracker, RemapTable, RoleRecord, Snapshot,
    DEFAULT_ROLE_NAME,
};
use specchio_error::{
    ApiErrorKind, CloneError, CloneErrorKind, SpecchioError, SpecchioErrorKind, SpecchioResult,
};
use tracing::{info, instrument};

/// Options for a replication run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct CloneOptions {
    /// Delete the target's existing emojis, channels, and roles before
    /// recreating from the source.
    pub wipe: bool,
}

/// Outcome of a replication run: per-phase summaries and created-entity
/// counts.
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct CloneReport {
    /// Summary of every phase that ran, in order.
    phases: Vec<PhaseSummary>,
    /// Roles created on the target (the default role edit is not a creation).
    roles_created: usize,
    /// Categories created on the target.
    categories_created: usize,
    /// Channels created on the target.
    channels_created: usize,
    /// Emojis created on the target.
    emojis_created: usize,
}

impl CloneReport {
    /// Total error tally across all phases.
    pub fn errors(&self) -> usize {
        self.phases.iter().map(|p| *p.errors()).sum()
    }
}

fn failure_label(item: &str, err: &SpecchioError) -> String {
    match err.kind() {
        SpecchioErrorKind::Api(api) => match api.kind() {
            ApiErrorKind::Forbidden => format!("forbidden: {item}"),
            ApiErrorKind::BadRequest(detail) => format!("http error: {item} - {detail}"),
            ApiErrorKind::Status(code) => format!("http error: {item} (status {code})"),
            other => format!("error: {item} - {other}"),
        },
        other => format!("error: {item} - {other}"),
    }
}

/// Orchestrates the ordered replication phases over a target writer.
///
/// One pipeline drives one target. The remap table is reset at the start of
/// every full run; partial runs ([`clone_structure`](Self::clone_structure)
/// and friends) reuse whatever the pipeline has accumulated, so roles cloned
/// earlier in the session still resolve in overwrite translation.
///
/// All phases run on a single control flow: items are processed one at a
/// time, and the writer paces each mutation against the shared rate budget.
///
/// # Example
///
/// ```no_run
/// use specchio_api::{CdnClient, RestTarget};
/// use specchio_clone::{CloneOptions, ClonePipeline};
/// use specchio_rate_limit::SpecchioConfig;
///
/// # async fn run(snapshot: specchio_core::Snapshot) -> Result<(), Box<dyn std::error::Error>> {
/// let config = SpecchioConfig::load()?;
/// let writer = RestTarget::new(std::env::var("BOT_TOKEN")?, 987654321, &config);
/// let mut pipeline = ClonePipeline::new(writer, CdnClient::new(&config));
///
/// let report = pipeline.full_clone(&snapshot, CloneOptions::new(true)).await?;
/// println!("cloned with {} errors", report.errors());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClonePipeline<W, F> {
    writer: W,
    assets: F,
    tracker: ProgressTracker,
    remap: RemapTable,
}

impl<W: TargetWriter, F: AssetFetcher> ClonePipeline<W, F> {
    /// Create a pipeline over a writer and an asset fetcher.
    pub fn new(writer: W, assets: F) -> Self {
        Self::with_tracker(writer, assets, ProgressTracker::new())
    }

    /// Create a pipeline sharing an externally observed progress tracker.
    pub fn with_tracker(writer: W, assets: F, tracker: ProgressTracker) -> Self {
        Self {
            writer,
            assets,
            tracker,
            remap: RemapTable::new(),
        }
    }

    /// The progress tracker (counters and event log).
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// The identifier remap accumulated so far.
    pub fn remap(&self) -> &RemapTable {
        &self.remap
    }

    /// Preflight: target reachable and both mutation permissions held.
    /// Failing either aborts before any mutation is attempted.
    async fn checked_preflight(&self) -> SpecchioResult<TargetInfo> {
        let info = self.writer.preflight().await?;
        if !info.can_mutate() {
            return Err(CloneError::new(CloneErrorKind::MissingPermissions(
                info.missing_permissions().join(", "),
            ))
            .into());
        }
        Ok(info)
    }

    fn handle_failure(&mut self, operation: Operation, item: &str, err: &SpecchioError) {
        let label = failure_label(item, err);
        match on_failure(operation) {
            OnFailure::Count => self.tracker.failed(label),
            OnFailure::BestEffort => self.tracker.note(format!("{operation} skipped: {label}")),
        }
    }

    /// Replicate the whole snapshot: settings, optional wipe, roles,
    /// categories, channels, emojis.
    ///
    /// # Errors
    ///
    /// Returns an error only for unmet preconditions; per-item failures are
    /// counted in the report.
    #[instrument(skip(self, snapshot), fields(source_id = *snapshot.source_id()))]
    pub async fn full_clone(
        &mut self,
        snapshot: &Snapshot,
        options: CloneOptions,
    ) -> SpecchioResult<CloneReport> {
        let target = self.checked_preflight().await?;
        let guild = snapshot
            .guild_record()
            .ok_or_else(|| invalid_source(snapshot))?
            .clone();

        info!(
            source = %guild.name(),
            target = %target.name(),
            "starting full clone"
        );

        // A fresh translation table for each full run.
        self.remap = RemapTable::new();
        let mut report = CloneReport::default();

        self.phase_settings(&guild, &mut report).await;
        if options.wipe {
            self.wipe_emojis(&mut report).await;
            self.wipe_channels_phase(&mut report).await;
            self.wipe_roles_phase(&mut report).await;
        }
        self.phase_roles(snapshot, &target, &mut report).await;
        self.phase_categories(snapshot, &target, &mut report).await;
        self.phase_channels(snapshot, &target, &mut report).await;
        self.phase_emojis(snapshot, &mut report).await;

        info!(
            roles = report.roles_created,
            categories = report.categories_created,
            channels = report.channels_created,
            emojis = report.emojis_created,
            errors = report.errors(),
            "full clone complete"
        );
        Ok(report)
    }

    /// Replicate roles only (permissions included), optionally wiping the
    /// target's roles first.
    #[instrument(skip(self, snapshot))]
    pub async fn clone_roles(
        &mut self,
        snapshot: &Snapshot,
        wipe: bool,
    ) -> SpecchioResult<CloneReport> {
        let target = self.checked_preflight().await?;
        let mut report = CloneReport::default();
        if wipe {
            self.wipe_roles_phase(&mut report).await;
        }
        self.phase_roles(snapshot, &target, &mut report).await;
        Ok(report)
    }

    /// Replicate categories and channels, optionally wiping the target's
    /// channels first.
    #[instrument(skip(self, snapshot))]
    pub async fn clone_structure(
        &mut self,
        snapshot: &Snapshot,
        wipe: bool,
    ) -> SpecchioResult<CloneReport> {
        let target = self.checked_preflight().await?;
        let mut report = CloneReport::default();
        if wipe {
            self.wipe_channels_phase(&mut report).await;
        }
        self.phase_categories(snapshot, &target, &mut report).await;
        self.phase_channels(snapshot, &target, &mut report).await;
        Ok(report)
    }

    /// Replicate emojis, optionally wiping the target's emojis first.
    #[instrument(skip(self, snapshot))]
    pub async fn clone_emojis(
        &mut self,
        snapshot: &Snapshot,
        wipe: bool,
    ) -> SpecchioResult<CloneReport> {
        self.checked_preflight().await?;
        let mut report = CloneReport::default();
        if wipe {
            self.wipe_emojis(&mut report).await;
        }
        self.phase_emojis(snapshot, &mut report).await;
        Ok(report)
    }

    /// Delete every role on the target except the default role.
    #[instrument(skip(self))]
    pub async fn wipe_roles(&mut self) -> SpecchioResult<CloneReport> {
        self.checked_preflight().await?;
        let mut report = CloneReport::default();
        self.wipe_roles_phase(&mut report).await;
        Ok(report)
    }

    /// Delete every channel and category on the target.
    #[instrument(skip(self))]
    pub async fn wipe_channels(&mut self) -> SpecchioResult<CloneReport> {
        self.checked_preflight().await?;
        let mut report = CloneReport::default();
        self.wipe_channels_phase(&mut report).await;
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------

    async fn phase_settings(&mut self, guild: &GuildRecord, report: &mut CloneReport) {
        self.tracker.begin("Updating Guild", 0);

        match self.writer.edit_guild(Some(guild.name()), None).await {
            Ok(()) => self
                .tracker
                .created(format!("renamed guild to: {}", guild.name())),
            Err(e) => self.handle_failure(Operation::EditSettings, guild.name(), &e),
        }

        // The icon travels as a CDN fetch plus a second guild edit; both are
        // best-effort.
        if let Some(hash) = guild.icon() {
            match self.assets.guild_icon(*guild.id(), hash).await {
                Ok(bytes) => {
                    let icon = ImageData::png(bytes);
                    match self.writer.edit_guild(None, Some(&icon)).await {
                        Ok(()) => self.tracker.created("changed guild icon"),
                        Err(e) => self.handle_failure(Operation::FetchIcon, "icon", &e),
                    }
                }
                Err(e) => self.handle_failure(Operation::FetchIcon, "icon", &e),
            }
        }

        report.phases.push(self.tracker.finish_phase());
    }

    async fn wipe_emojis(&mut self, report: &mut CloneReport) {
        let emojis = match self.writer.list_emojis().await {
            Ok(emojis) => emojis,
            Err(e) => {
                self.tracker.begin("Deleting Emojis", 0);
                self.handle_failure(Operation::DeleteEmoji, "emoji list", &e);
                report.phases.push(self.tracker.finish_phase());
                return;
            }
        };

        self.tracker.begin("Deleting Emojis", emojis.len());
        for emoji in &emojis {
            match self.writer.delete_emoji(*emoji.id()).await {
                Ok(()) => self
                    .tracker
                    .deleted(format!("deleted emoji: {}", emoji.name())),
                Err(e) => self.handle_failure(Operation::DeleteEmoji, emoji.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }

    async fn wipe_channels_phase(&mut self, report: &mut CloneReport) {
        let channels = match self.writer.list_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                self.tracker.begin("Deleting Channels", 0);
                self.handle_failure(Operation::DeleteChannel, "channel list", &e);
                report.phases.push(self.tracker.finish_phase());
                return;
            }
        };

        self.tracker.begin("Deleting Channels", channels.len());
        for channel in &channels {
            match self.writer.delete_channel(*channel.id()).await {
                Ok(()) => self
                    .tracker
                    .deleted(format!("deleted channel: {}", channel.name())),
                Err(e) => self.handle_failure(Operation::DeleteChannel, channel.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }

    async fn wipe_roles_phase(&mut self, report: &mut CloneReport) {
        let roles = match self.writer.list_roles().await {
            Ok(roles) => roles,
            Err(e) => {
                self.tracker.begin("Deleting Roles", 0);
                self.handle_failure(Operation::DeleteRole, "role list", &e);
                report.phases.push(self.tracker.finish_phase());
                return;
            }
        };

        // The default role cannot be deleted; it is edited in place later.
        let roles: Vec<_> = roles
            .into_iter()
            .filter(|r| r.name() != DEFAULT_ROLE_NAME)
            .collect();

        self.tracker.begin("Deleting Roles", roles.len());
        for role in &roles {
            match self.writer.delete_role(*role.id()).await {
                Ok(()) => self
                    .tracker
                    .deleted(format!("deleted role: {}", role.name())),
                Err(e) => self.handle_failure(Operation::DeleteRole, role.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }

    async fn phase_roles(
        &mut self,
        snapshot: &Snapshot,
        target: &TargetInfo,
        report: &mut CloneReport,
    ) {
        let mut roles: Vec<RoleRecord> = snapshot.roles().items().clone();
        roles.sort_by_key(|r| *r.position());

        self.tracker.begin("Creating Roles", roles.len());
        for role in &roles {
            if role.is_default() {
                let edit = EditRole::with_permissions(*role.permissions());
                match self.writer.edit_role(*target.default_role_id(), &edit).await {
                    Ok(()) => {
                        self.remap.record_role(*role.id(), *target.default_role_id());
                        self.tracker.created("updated @everyone permissions");
                    }
                    Err(e) => self.handle_failure(Operation::EditDefaultRole, role.name(), &e),
                }
                continue;
            }

            let request = CreateRole::from(role);
            match self.writer.create_role(&request).await {
                Ok(id) => {
                    self.remap.record_role(*role.id(), id);
                    report.roles_created += 1;
                    self.tracker
                        .created(format!("created role: {}", role.name()));
                }
                Err(e) => self.handle_failure(Operation::CreateRole, role.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());

        // Creation order does not pin the hierarchy, so remapped roles get a
        // best-effort reposition pass.
        self.tracker.begin("Reordering Roles", 0);
        for role in &roles {
            if role.is_default() {
                continue;
            }
            let Some(target_id) = self.remap.role(*role.id()) else {
                continue;
            };
            let edit = EditRole::with_position(*role.position());
            if let Err(e) = self.writer.edit_role(target_id, &edit).await {
                self.handle_failure(Operation::RepositionRole, role.name(), &e);
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }

    async fn phase_categories(
        &mut self,
        snapshot: &Snapshot,
        target: &TargetInfo,
        report: &mut CloneReport,
    ) {
        let mut categories: Vec<&ChannelRecord> = snapshot
            .channels()
            .items()
            .iter()
            .filter(|c| c.kind().is_category())
            .collect();
        categories.sort_by_key(|c| *c.position());

        self.tracker.begin("Creating Categories", categories.len());
        if categories.is_empty() {
            report.phases.push(self.tracker.finish_phase());
            return;
        }

        for category in categories {
            let grants = OverwriteTranslator::new(
                &self.remap,
                *snapshot.source_id(),
                *target.default_role_id(),
            )
            .translate(category.permission_overwrites());

            match self
                .writer
                .create_category(category.name(), *category.position(), &grants)
                .await
            {
                Ok(id) => {
                    let edit = EditChannel::with_position(*category.position());
                    if let Err(e) = self.writer.edit_channel(id, &edit).await {
                        self.handle_failure(Operation::RepositionCategory, category.name(), &e);
                    }
                    self.remap.record_category(*category.id(), id);
                    report.categories_created += 1;
                    self.tracker
                        .created(format!("created category: {}", category.name()));
                }
                Err(e) => self.handle_failure(Operation::CreateCategory, category.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }

    async fn phase_channels(
        &mut self,
        snapshot: &Snapshot,
        target: &TargetInfo,
        report: &mut CloneReport,
    ) {
        let mut channels: Vec<&ChannelRecord> = snapshot
            .channels()
            .items()
            .iter()
            .filter(|c| !c.kind().is_category())
            .collect();
        channels.sort_by_key(|c| *c.position());

        self.tracker.begin("Creating Channels", channels.len());
        if channels.is_empty() {
            report.phases.push(self.tracker.finish_phase());
            return;
        }

        for channel in channels {
            // An unresolved parent means the category was not migrated; the
            // channel is created at the top level instead of erroring.
            let parent = (*channel.parent_id()).and_then(|id| self.remap.category(id));
            let grants = OverwriteTranslator::new(
                &self.remap,
                *snapshot.source_id(),
                *target.default_role_id(),
            )
            .translate(channel.permission_overwrites());

            let request = CreateChannel::from_record(channel, parent, &grants);
            match self.writer.create_channel(&request).await {
                Ok(id) => {
                    self.remap.record_channel(*channel.id(), id);
                    report.channels_created += 1;
                    self.tracker
                        .created(format!("created {}: {}", channel.kind(), channel.name()));
                }
                Err(e) => self.handle_failure(Operation::CreateChannel, channel.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }

    async fn phase_emojis(&mut self, snapshot: &Snapshot, report: &mut CloneReport) {
        let emojis = snapshot.emojis().items();

        self.tracker.begin("Creating Emojis", emojis.len());
        if emojis.is_empty() {
            self.tracker.note("no emojis to create");
            report.phases.push(self.tracker.finish_phase());
            return;
        }

        for emoji in emojis {
            let Some(id) = *emoji.id() else {
                self.tracker
                    .failed(format!("no emoji id for: {}", emoji.name()));
                continue;
            };

            match self.assets.emoji(id, *emoji.animated()).await {
                Ok(bytes) => {
                    let image = ImageData::new(bytes, *emoji.animated());
                    match self.writer.create_emoji(emoji.name(), &image).await {
                        Ok(_) => {
                            report.emojis_created += 1;
                            self.tracker
                                .created(format!("created emoji: {}", emoji.name()));
                        }
                        Err(e) => self.handle_failure(Operation::CreateEmoji, emoji.name(), &e),
                    }
                }
                Err(e) => self.handle_failure(Operation::FetchEmoji, emoji.name(), &e),
            }
        }
        report.phases.push(self.tracker.finish_phase());
    }
}

fn invalid_source(snapshot: &Snapshot) -> SpecchioError {
    let reason = match snapshot.guild() {
        Err(failure) => failure.to_string(),
        Ok(_) => "guild record unusable".to_string(),
    };
    CloneError::new(CloneErrorKind::InvalidSource(reason)).into()
}
