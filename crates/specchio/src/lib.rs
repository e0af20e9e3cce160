//! Specchio - Structural Guild Replication Engine
//!
//! Specchio captures a snapshot of a source guild's structure — roles,
//! categories, channels, permission overwrites, and emojis — over the REST
//! read surface and reproduces it on a target guild through the mutation
//! surface, translating every internal cross-reference from source ids to
//! freshly created target ids.
//!
//! # Features
//!
//! - **Snapshot capture**: four independent reads with per-resource failure
//!   tolerance
//! - **Ordered replication**: roles before categories before channels, with
//!   reposition passes where creation order does not pin the result
//! - **Identifier translation**: a per-run remap table built as creations
//!   succeed
//! - **Failure isolation**: per-item failures are logged and counted, never
//!   fatal
//! - **Pacing**: one global mutation budget with automatic rate limit retry
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use specchio::{
//!     CdnClient, CloneOptions, ClonePipeline, RestTarget, SourceClient, SpecchioConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     specchio::init_observability()?;
//!     let config = SpecchioConfig::load()?;
//!
//!     let source = SourceClient::new(std::env::var("SOURCE_TOKEN")?, &config);
//!     let snapshot = source.capture(123456789).await;
//!
//!     let writer = RestTarget::new(std::env::var("BOT_TOKEN")?, 987654321, &config);
//!     let mut pipeline = ClonePipeline::new(writer, CdnClient::new(&config));
//!     let report = pipeline.full_clone(&snapshot, CloneOptions::new(true)).await?;
//!
//!     println!("done with {} errors", report.errors());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Specchio is organized as a workspace with focused crates:
//!
//! - `specchio_error` - Error types
//! - `specchio_core` - Snapshot data model, remap table, progress tracking
//! - `specchio_rate_limit` - Pacing, retry intervals, configuration
//! - `specchio_api` - REST read and mutation surfaces
//! - `specchio_clone` - The phase-ordered replication pipeline
//!
//! This crate (`specchio`) re-exports everything for convenience.

// Re-export core crates (always available)
pub use specchio_api::*;
pub use specchio_clone::*;
pub use specchio_core::*;
pub use specchio_error::*;
pub use specchio_rate_limit::*;

mod observability;

pub use observability::{
    init_observability, init_observability_with_config, ObservabilityConfig,
};
