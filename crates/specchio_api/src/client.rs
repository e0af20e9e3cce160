//! Read-path client for scraping the source guild.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use specchio_error::{ApiError, ApiErrorKind, SpecchioError, SpecchioResult};
use specchio_rate_limit::{retry_after, RetryConfig, SpecchioConfig};
use tracing::{debug, instrument, warn};

/// Client for the source guild's read surface.
///
/// Reads are not paced: the snapshot capture is a handful of requests, and
/// rate limit responses are absorbed by the retry loop instead. The client
/// never raises past its boundary — every failure comes back as a typed
/// [`ApiError`].
///
/// # Example
///
/// ```no_run
/// use specchio_api::SourceClient;
/// use specchio_rate_limit::SpecchioConfig;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SpecchioConfig::load()?;
/// let client = SourceClient::new(std::env::var("SOURCE_TOKEN")?, &config);
/// let snapshot = client.capture(123456789).await;
/// println!("captured {} channels", snapshot.channels().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry: RetryConfig,
}

impl SourceClient {
    /// Create a new source client with the given credential.
    #[instrument(skip(token, config), fields(token_len = token.as_ref().len()))]
    pub fn new(token: impl AsRef<str>, config: &SpecchioConfig) -> Self {
        debug!("Creating source client");
        Self {
            http: reqwest::Client::new(),
            base_url: config.api.base_url.clone(),
            token: token.as_ref().to_string(),
            retry: config.retry.clone(),
        }
    }

    /// Fetch and decode a document from the read surface.
    ///
    /// On a rate limit response, sleeps for the server-supplied interval
    /// (falling back to the configured default) and retries the same request
    /// — an explicit loop bounded by `retry.max_attempts`, never recursion.
    /// Authorization failures (401) and access failures (403) are terminal
    /// and never retried.
    #[instrument(skip(self))]
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SpecchioResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_wait = self.retry.default_retry();

        for attempt in 1..=self.retry.max_attempts.max(1) {
            let response = self
                .http
                .get(&url)
                .header(AUTHORIZATION, &self.token)
                .send()
                .await
                .map_err(|e| {
                    SpecchioError::from(ApiError::new(ApiErrorKind::Transport(e.to_string())))
                })?;

            let status = response.status();
            if status.is_success() {
                return response.json::<T>().await.map_err(|e| {
                    ApiError::new(ApiErrorKind::Malformed(e.to_string())).into()
                });
            }

            match status.as_u16() {
                429 => {
                    let wait = retry_after(response.headers(), self.retry.default_retry());
                    warn!(
                        path,
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "rate limited, retrying"
                    );
                    last_wait = wait;
                    tokio::time::sleep(wait).await;
                }
                401 => return Err(ApiError::new(ApiErrorKind::Unauthorized).into()),
                403 => return Err(ApiError::new(ApiErrorKind::Forbidden).into()),
                code => return Err(ApiError::new(ApiErrorKind::Status(code)).into()),
            }
        }

        Err(ApiError::new(ApiErrorKind::RateLimited {
            retry_after_secs: last_wait.as_secs_f64(),
        })
        .into())
    }
}
