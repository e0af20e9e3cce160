//! Immutable captured copy of the source guild graph.

use crate::records::{ChannelRecord, EmojiRecord, GuildRecord, RoleRecord};
use chrono::{DateTime, Utc};
use derive_new::new;
use std::fmt;

/// Why a capture read failed, retained alongside the partial result.
#[derive(Debug, Clone, PartialEq, Eq, new, derive_getters::Getters)]
pub struct CaptureFailure {
    /// Human-readable failure reason.
    reason: String,
    /// HTTP status code when the failure came from the remote API.
    status: Option<u16>,
}

impl CaptureFailure {
    /// Build a failure from a plain reason with no status code.
    pub fn from_reason(reason: impl Into<String>) -> Self {
        Self::new(reason.into(), None)
    }
}

impl fmt::Display for CaptureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.reason, status),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// A captured sub-resource list: the items that were fetched plus the
/// failure reason when the fetch did not succeed.
///
/// A failed fetch yields an empty item list, never a missing field, so
/// downstream phases can iterate unconditionally.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct Captured<T> {
    items: Vec<T>,
    failure: Option<CaptureFailure>,
}

impl<T> Default for Captured<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failure: None,
        }
    }
}

impl<T> Captured<T> {
    /// A successful capture.
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            failure: None,
        }
    }

    /// A failed capture: empty items, reason retained.
    pub fn failed(failure: CaptureFailure) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(failure),
        }
    }

    /// Number of captured items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no items were captured.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Immutable snapshot of the source guild, captured once per scrape and held
/// read-only for the session.
///
/// The guild record is the one sub-resource whose failure is kept as an
/// explicit error value: downstream phases need at least a valid name, so a
/// defaulted record would hide an unusable capture.
#[derive(Debug, Clone, new, derive_getters::Getters)]
pub struct Snapshot {
    /// Source guild id the capture was issued against.
    source_id: u64,
    /// Capture timestamp.
    captured_at: DateTime<Utc>,
    /// Top-level guild metadata, or the reason it could not be fetched.
    guild: Result<GuildRecord, CaptureFailure>,
    /// Channels and categories, ordered as returned by the source.
    channels: Captured<ChannelRecord>,
    /// Roles, ordered as returned by the source.
    roles: Captured<RoleRecord>,
    /// Custom emojis.
    emojis: Captured<EmojiRecord>,
}

impl Snapshot {
    /// The guild record when the top-level read succeeded.
    pub fn guild_record(&self) -> Option<&GuildRecord> {
        self.guild.as_ref().ok()
    }

    /// Channel, role, and emoji counts, in that order.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.channels.len(), self.roles.len(), self.emojis.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::GuildRecordBuilder;

    fn guild() -> GuildRecord {
        GuildRecordBuilder::default()
            .id(1u64)
            .name("origin".to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn test_failed_capture_is_empty_with_reason() {
        let captured: Captured<RoleRecord> =
            Captured::failed(CaptureFailure::new("forbidden".to_string(), Some(403)));
        assert!(captured.is_empty());
        assert_eq!(
            captured.failure().as_ref().unwrap().to_string(),
            "forbidden (status 403)"
        );
    }

    #[test]
    fn test_snapshot_guild_record_accessor() {
        let snapshot = Snapshot::new(
            1,
            Utc::now(),
            Ok(guild()),
            Captured::default(),
            Captured::default(),
            Captured::default(),
        );
        assert_eq!(snapshot.guild_record().unwrap().name(), "origin");
        assert_eq!(snapshot.counts(), (0, 0, 0));
    }

    #[test]
    fn test_snapshot_with_failed_guild() {
        let snapshot = Snapshot::new(
            1,
            Utc::now(),
            Err(CaptureFailure::from_reason("no response")),
            Captured::default(),
            Captured::default(),
            Captured::default(),
        );
        assert!(snapshot.guild_record().is_none());
    }
}
