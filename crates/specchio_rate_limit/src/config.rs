//! Configuration structures for pacing and retry behavior.
//!
//! This module provides TOML-based configuration. The configuration system
//! supports:
//! - Bundled defaults (include_str! from specchio.toml)
//! - User overrides (./specchio.toml or ~/.config/specchio/specchio.toml)
//! - Automatic merging with user values taking precedence

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use specchio_error::{ConfigError, SpecchioError, SpecchioResult};
use std::time::Duration;
use tracing::{debug, instrument};

/// Pacing section: the single global mutation budget.
///
/// # Example
///
/// ```toml
/// [pacing]
/// min_interval_ms = 600
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Minimum interval between mutating calls, in milliseconds.
    pub min_interval_ms: u64,
}

impl PacingConfig {
    /// The minimum interval as a [`Duration`].
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 600,
        }
    }
}

/// Retry section: bounds for the rate-limit retry loop.
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 5
/// default_retry_secs = 5.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Upper bound on attempts for a single request under sustained rate
    /// limiting.
    pub max_attempts: u32,
    /// Wait applied when a rate limit response carries no retry header, in
    /// seconds.
    pub default_retry_secs: f64,
}

impl RetryConfig {
    /// The fallback retry wait as a [`Duration`].
    pub fn default_retry(&self) -> Duration {
        Duration::from_secs_f64(self.default_retry_secs.max(0.0))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            default_retry_secs: 5.0,
        }
    }
}

/// API section: remote endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the REST API.
    pub base_url: String,
    /// Base URL of the CDN serving icon and emoji binaries.
    pub cdn_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://discord.com/api/v10".to_string(),
            cdn_url: "https://cdn.discordapp.com".to_string(),
        }
    }
}

/// Top-level specchio configuration.
///
/// Loads from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from specchio.toml)
/// 2. User override (./specchio.toml or ~/.config/specchio/specchio.toml)
///
/// # Example
///
/// ```no_run
/// use specchio_rate_limit::SpecchioConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SpecchioConfig::load()?;
/// println!("pacing every {}ms", config.pacing.min_interval_ms);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct SpecchioConfig {
    /// Mutation pacing budget.
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Rate-limit retry bounds.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Remote endpoint locations.
    #[serde(default)]
    pub api: ApiConfig,
}

impl SpecchioConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> SpecchioResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                SpecchioError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                SpecchioError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override
    /// earlier):
    /// 1. Bundled defaults (specchio.toml shipped with the library)
    /// 2. User config in home directory (~/.config/specchio/specchio.toml)
    /// 3. User config in current directory (./specchio.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> SpecchioResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../specchio.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/specchio/specchio.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("specchio").required(false));

        builder
            .build()
            .map_err(|e| {
                SpecchioError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                SpecchioError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
