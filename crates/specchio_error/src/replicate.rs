//! Replication pipeline error types.
//!
//! These are the only conditions that abort an entire run; per-item failures
//! stay inside the pipeline as counted [`ApiError`](crate::ApiError)s.

use derive_getters::Getters;

/// Pipeline error variants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CloneErrorKind {
    /// No snapshot was captured before a clone operation was requested.
    #[display("no snapshot available")]
    MissingSnapshot,

    /// The snapshot's guild record is an error or lacks a usable name.
    #[display("invalid source data: {_0}")]
    InvalidSource(String),

    /// The target guild could not be reached during preflight.
    #[display("target unreachable: {_0}")]
    TargetUnreachable(String),

    /// The caller lacks a required mutation permission on the target.
    #[display("missing permission: {_0}")]
    MissingPermissions(String),
}

/// Pipeline error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Clone Error: {} at line {} in {}", kind, line, file)]
pub struct CloneError {
    kind: CloneErrorKind,
    line: u32,
    file: &'static str,
}

impl CloneError {
    /// Create a new CloneError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use specchio_error::{CloneError, CloneErrorKind};
    ///
    /// let err = CloneError::new(CloneErrorKind::MissingSnapshot);
    /// ```
    #[track_caller]
    pub fn new(kind: CloneErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for pipeline operations.
pub type CloneResult<T> = Result<T, CloneError>;
