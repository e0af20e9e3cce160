//! Error types for the specchio guild replication engine.
//!
//! Each domain gets its own error struct carrying the kind plus the source
//! location where the error was constructed. The top-level [`SpecchioError`]
//! wraps every domain error behind a single kind enum so `?` works across
//! crate boundaries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod json;
mod replicate;

pub use api::{ApiError, ApiErrorKind, ApiResult};
pub use config::ConfigError;
pub use error::{SpecchioError, SpecchioErrorKind, SpecchioResult};
pub use json::JsonError;
pub use replicate::{CloneError, CloneErrorKind, CloneResult};
