//! Top-level error wrapper types.

use crate::{ApiError, CloneError, ConfigError, JsonError};

/// This is the foundation error enum. Every specchio crate funnels its
/// domain error into one of these variants.
///
/// # Examples
///
/// ```
/// use specchio_error::{SpecchioError, ConfigError};
///
/// let cfg_err = ConfigError::new("missing field");
/// let err: SpecchioError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SpecchioErrorKind {
    /// Remote API error (read or write path)
    #[from(ApiError)]
    Api(ApiError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Replication pipeline error
    #[from(CloneError)]
    Clone(CloneError),
}

/// Specchio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use specchio_error::{SpecchioResult, ConfigError};
///
/// fn might_fail() -> SpecchioResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("success"),
///     Err(e) => println!("error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Specchio Error: {}", _0)]
pub struct SpecchioError(Box<SpecchioErrorKind>);

impl SpecchioError {
    /// Create a new error from a kind.
    pub fn new(kind: SpecchioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SpecchioErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to SpecchioErrorKind
impl<T> From<T> for SpecchioError
where
    T: Into<SpecchioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for specchio operations.
///
/// # Examples
///
/// ```
/// use specchio_error::{SpecchioResult, JsonError};
///
/// fn decode() -> SpecchioResult<String> {
///     Err(JsonError::new("unexpected token"))?
/// }
/// ```
pub type SpecchioResult<T> = std::result::Result<T, SpecchioError>;
