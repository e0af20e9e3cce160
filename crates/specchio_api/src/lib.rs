//! REST read and mutation surfaces for the specchio replication engine.
//!
//! # Architecture
//!
//! The crate splits the remote surface along the read/write seam:
//!
//! ## Read path
//! - [`SourceClient`]: scrapes the source guild with the user credential.
//!   Rate limit responses are resolved internally with a bounded retry loop;
//!   authorization failures surface as terminal typed errors.
//! - [`SourceClient::capture`]: issues the four snapshot reads and assembles
//!   an immutable [`Snapshot`](specchio_core::Snapshot), defaulting each
//!   failed sub-resource to an empty list with the reason retained.
//!
//! ## Write path
//! - [`TargetWriter`]: the mutation surface the pipeline drives. A trait so
//!   the pipeline can be exercised against a scripted target in tests.
//! - [`RestTarget`]: the REST implementation, authorized with the bot
//!   credential and paced by the shared
//!   [`Pacer`](specchio_rate_limit::Pacer) before every mutation.
//!
//! ## Content delivery
//! - [`AssetFetcher`]/[`CdnClient`]: binary payload fetch for guild icons
//!   and emoji images.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capture;
mod cdn;
mod client;
mod payloads;
mod rest;
mod writer;

pub use capture::UserIdentity;
pub use cdn::{AssetFetcher, CdnClient};
pub use client::SourceClient;
pub use payloads::{
    CreateChannel, CreateRole, EditChannel, EditRole, ImageData, OverwritePayload,
};
pub use rest::RestTarget;
pub use writer::{ResourceSummary, TargetInfo, TargetWriter, MANAGE_CHANNELS, MANAGE_ROLES};
