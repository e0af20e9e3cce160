//! Snapshot capture: the four reads that build the source graph.

use crate::client::SourceClient;
use chrono::Utc;
use specchio_core::de;
use specchio_core::{
    Captured, CaptureFailure, ChannelRecord, EmojiRecord, GuildRecord, RoleRecord, Snapshot,
};
use serde::Deserialize;
use specchio_error::{SpecchioError, SpecchioErrorKind, SpecchioResult};
use specchio_error::ApiErrorKind;
use tracing::{info, instrument, warn};

/// The authenticated identity behind the read credential.
///
/// Consumed by the embedding application for credential validation; the
/// capture itself does not depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct UserIdentity {
    /// User snowflake id.
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    id: u64,
    /// Username.
    username: String,
}

fn capture_failure(err: &SpecchioError) -> CaptureFailure {
    match err.kind() {
        SpecchioErrorKind::Api(api) => {
            let status = match api.kind() {
                ApiErrorKind::Unauthorized => Some(401),
                ApiErrorKind::Forbidden => Some(403),
                ApiErrorKind::BadRequest(_) => Some(400),
                ApiErrorKind::RateLimited { .. } => Some(429),
                ApiErrorKind::Status(code) => Some(*code),
                ApiErrorKind::Transport(_) | ApiErrorKind::Malformed(_) => None,
            };
            CaptureFailure::new(api.kind().to_string(), status)
        }
        other => CaptureFailure::from_reason(other.to_string()),
    }
}

impl SourceClient {
    /// Identity of the read credential. Used by credential validation.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> SpecchioResult<UserIdentity> {
        self.get_json("/users/@me").await
    }

    /// Top-level guild metadata, with the member-count flag set.
    #[instrument(skip(self))]
    pub async fn guild(&self, guild_id: u64) -> SpecchioResult<GuildRecord> {
        self.get_json(&format!("/guilds/{guild_id}?with_counts=true"))
            .await
    }

    /// The guild's channels and categories.
    #[instrument(skip(self))]
    pub async fn channels(&self, guild_id: u64) -> SpecchioResult<Vec<ChannelRecord>> {
        self.get_json(&format!("/guilds/{guild_id}/channels")).await
    }

    /// The guild's roles.
    #[instrument(skip(self))]
    pub async fn roles(&self, guild_id: u64) -> SpecchioResult<Vec<RoleRecord>> {
        self.get_json(&format!("/guilds/{guild_id}/roles")).await
    }

    /// The guild's custom emojis.
    #[instrument(skip(self))]
    pub async fn emojis(&self, guild_id: u64) -> SpecchioResult<Vec<EmojiRecord>> {
        self.get_json(&format!("/guilds/{guild_id}/emojis")).await
    }

    /// Capture a snapshot of the source guild.
    ///
    /// All four reads are attempted regardless of individual failures. Each
    /// list defaults to empty with the failure reason retained; the guild
    /// read failure is kept as an explicit error value because downstream
    /// phases need at least a valid name.
    #[instrument(skip(self))]
    pub async fn capture(&self, guild_id: u64) -> Snapshot {
        info!(guild_id, "capturing source guild");

        let guild = self.guild(guild_id).await.map_err(|e| {
            warn!(error = %e, "guild metadata read failed");
            capture_failure(&e)
        });

        let channels = match self.channels(guild_id).await {
            Ok(items) => Captured::ok(items),
            Err(e) => {
                warn!(error = %e, "channel list read failed");
                Captured::failed(capture_failure(&e))
            }
        };

        let roles = match self.roles(guild_id).await {
            Ok(items) => Captured::ok(items),
            Err(e) => {
                warn!(error = %e, "role list read failed");
                Captured::failed(capture_failure(&e))
            }
        };

        let emojis = match self.emojis(guild_id).await {
            Ok(items) => Captured::ok(items),
            Err(e) => {
                warn!(error = %e, "emoji list read failed");
                Captured::failed(capture_failure(&e))
            }
        };

        let snapshot = Snapshot::new(guild_id, Utc::now(), guild, channels, roles, emojis);
        let (channel_count, role_count, emoji_count) = snapshot.counts();
        info!(
            channel_count,
            role_count, emoji_count, "capture complete"
        );
        snapshot
    }
}
