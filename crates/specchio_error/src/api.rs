//! Remote API error types.
//!
//! The taxonomy mirrors the contract of the read and write paths: rate limit
//! responses are resolved inside the client and only surface when the retry
//! budget is exhausted; authorization failures are terminal; everything else
//! collapses into a status or transport error.

use derive_getters::Getters;

/// API error variants.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ApiErrorKind {
    /// Credentials rejected (401). Never retried.
    #[display("unauthorized: credentials rejected")]
    Unauthorized,

    /// Access denied (403). Never retried.
    #[display("forbidden: missing access")]
    Forbidden,

    /// Rate limited (429). Surfaces only when the retry budget is spent.
    #[display("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Server-supplied retry interval in seconds.
        retry_after_secs: f64,
    },

    /// The request payload was rejected (400).
    #[display("malformed request: {_0}")]
    BadRequest(String),

    /// Any other non-success status code.
    #[display("http status {_0}")]
    Status(u16),

    /// Network-level failure converted at the client boundary.
    #[display("transport error: {_0}")]
    Transport(String),

    /// The response body did not decode into the expected shape.
    #[display("malformed response: {_0}")]
    Malformed(String),
}

/// API error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("API Error: {} at line {} in {}", kind, line, file)]
pub struct ApiError {
    kind: ApiErrorKind,
    line: u32,
    file: &'static str,
}

impl ApiError {
    /// Create a new ApiError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use specchio_error::{ApiError, ApiErrorKind};
    ///
    /// let err = ApiError::new(ApiErrorKind::Forbidden);
    /// ```
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True for per-item failures the pipeline counts without aborting.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Forbidden)
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
