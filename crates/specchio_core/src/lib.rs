//! Core data types for the specchio guild replication engine.
//!
//! This crate provides the snapshot data model (the captured source graph),
//! the identifier remap table built during replication, and the progress
//! tracking surface the pipeline exposes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod de;
mod kind;
mod progress;
mod records;
mod remap;
mod snapshot;

pub use kind::{ChannelKind, OverwriteKind};
pub use progress::{Event, EventKind, EventLog, PhaseSummary, ProgressTracker};
pub use records::{
    ChannelRecord, ChannelRecordBuilder, EmojiRecord, EmojiRecordBuilder, GuildRecord,
    GuildRecordBuilder, OverwriteRecord, OverwriteRecordBuilder, PermissionGrant, RoleRecord,
    RoleRecordBuilder, DEFAULT_ROLE_NAME,
};
pub use remap::RemapTable;
pub use snapshot::{CaptureFailure, Captured, Snapshot};
