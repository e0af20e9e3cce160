//! Binary payload fetch from the content delivery network.

use async_trait::async_trait;
use specchio_error::{ApiError, ApiErrorKind, SpecchioResult};
use specchio_rate_limit::SpecchioConfig;
use tracing::{debug, instrument};

/// Source of icon and emoji binaries.
///
/// A seam so the pipeline's asset handling can be exercised without a
/// network. Fetch failures are ordinary typed errors the pipeline logs
/// without aborting.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch a guild icon by its content hash. Always png.
    async fn guild_icon(&self, guild_id: u64, hash: &str) -> SpecchioResult<Vec<u8>>;

    /// Fetch an emoji image by id; gif when animated, png otherwise.
    async fn emoji(&self, emoji_id: u64, animated: bool) -> SpecchioResult<Vec<u8>>;
}

/// HTTP client for the CDN.
#[derive(Debug, Clone)]
pub struct CdnClient {
    http: reqwest::Client,
    base_url: String,
}

impl CdnClient {
    /// Create a CDN client from the API configuration.
    pub fn new(config: &SpecchioConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api.cdn_url.clone(),
        }
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> SpecchioResult<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::new(ApiErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(ApiErrorKind::Status(status.as_u16())).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::new(ApiErrorKind::Transport(e.to_string())))?;
        debug!(len = bytes.len(), "fetched asset");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AssetFetcher for CdnClient {
    async fn guild_icon(&self, guild_id: u64, hash: &str) -> SpecchioResult<Vec<u8>> {
        let url = format!("{}/icons/{guild_id}/{hash}.png", self.base_url);
        self.fetch(&url).await
    }

    async fn emoji(&self, emoji_id: u64, animated: bool) -> SpecchioResult<Vec<u8>> {
        let ext = if animated { "gif" } else { "png" };
        let url = format!("{}/emojis/{emoji_id}.{ext}", self.base_url);
        self.fetch(&url).await
    }
}
