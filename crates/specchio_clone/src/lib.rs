//! Phase-ordered guild replication pipeline.
//!
//! [`ClonePipeline`] reads an immutable [`Snapshot`](specchio_core::Snapshot)
//! and drives a [`TargetWriter`](specchio_api::TargetWriter) through the
//! ordered phases: settings, optional wipe, roles, categories, channels,
//! emojis. Source identifiers are translated to freshly created target
//! identifiers through a per-run [`RemapTable`](specchio_core::RemapTable);
//! permission overwrites are rewritten by [`OverwriteTranslator`].
//!
//! Failure handling follows a fixed policy: every per-item failure is caught
//! at the item boundary, classified, logged, and counted, and the phase
//! continues with the next item. Only unmet preconditions — unreachable
//! target, missing mutation permissions, unusable source data — abort a run,
//! and they are checked before the first mutation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pipeline;
mod policy;
mod translate;

pub use pipeline::{CloneOptions, ClonePipeline, CloneReport};
pub use policy::{on_failure, OnFailure, Operation};
pub use translate::OverwriteTranslator;
