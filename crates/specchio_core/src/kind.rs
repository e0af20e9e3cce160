//! Closed variant sets for the integer type codes on the wire.

use serde::{Deserialize, Serialize};

/// Channel kind, decoded from the API's integer `type` code.
///
/// Unrecognized codes are preserved in [`ChannelKind::Other`] so a snapshot
/// round-trips without losing information; the pipeline treats them as
/// text-like at creation time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(from = "i64", into = "i64")]
#[strum(serialize_all = "lowercase")]
pub enum ChannelKind {
    /// Text channel (0).
    Text,
    /// Voice channel (2).
    Voice,
    /// Category container (4).
    Category,
    /// Announcement (news) channel (5).
    Announcement,
    /// Stage voice channel (13).
    Stage,
    /// Forum channel (15).
    Forum,
    /// Any other type code.
    Other(i64),
}

impl From<i64> for ChannelKind {
    fn from(code: i64) -> Self {
        match code {
            0 => ChannelKind::Text,
            2 => ChannelKind::Voice,
            4 => ChannelKind::Category,
            5 => ChannelKind::Announcement,
            13 => ChannelKind::Stage,
            15 => ChannelKind::Forum,
            other => ChannelKind::Other(other),
        }
    }
}

impl From<ChannelKind> for i64 {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Text => 0,
            ChannelKind::Voice => 2,
            ChannelKind::Category => 4,
            ChannelKind::Announcement => 5,
            ChannelKind::Stage => 13,
            ChannelKind::Forum => 15,
            ChannelKind::Other(other) => other,
        }
    }
}

impl ChannelKind {
    /// True for the container kind that holds other channels.
    pub fn is_category(&self) -> bool {
        matches!(self, ChannelKind::Category)
    }
}

/// Permission overwrite target kind (integer `type` code: 0 role, 1 member).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(from = "i64", into = "i64")]
#[strum(serialize_all = "lowercase")]
pub enum OverwriteKind {
    /// The overwrite targets a role.
    Role,
    /// The overwrite targets an individual member. Member ids are not
    /// portable across guilds, so these are dropped in translation.
    Member,
    /// Any other type code.
    Other(i64),
}

impl From<i64> for OverwriteKind {
    fn from(code: i64) -> Self {
        match code {
            0 => OverwriteKind::Role,
            1 => OverwriteKind::Member,
            other => OverwriteKind::Other(other),
        }
    }
}

impl From<OverwriteKind> for i64 {
    fn from(kind: OverwriteKind) -> Self {
        match kind {
            OverwriteKind::Role => 0,
            OverwriteKind::Member => 1,
            OverwriteKind::Other(other) => other,
        }
    }
}
