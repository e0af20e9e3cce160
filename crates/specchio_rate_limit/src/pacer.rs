//! Fixed-interval pacing for mutating calls.

use crate::PacingConfig;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, instrument};

/// Paces outgoing mutating calls to a fixed minimum interval.
///
/// A single global budget, not per-endpoint: the remote service's limits are
/// coarse-grained, so one shared pacer trades throughput for simplicity. The
/// first call proceeds immediately; each subsequent [`wait`](Pacer::wait)
/// blocks until at least the configured interval has elapsed since the
/// previous call was released.
///
/// # Example
///
/// ```no_run
/// use specchio_rate_limit::{Pacer, PacingConfig};
///
/// # async fn run() {
/// let pacer = Pacer::new(&PacingConfig::default());
/// pacer.wait().await; // immediate
/// pacer.wait().await; // released after the minimum interval
/// # }
/// ```
#[derive(Debug)]
pub struct Pacer {
    limiter: DefaultDirectRateLimiter,
    interval: Duration,
}

impl Pacer {
    /// Create a pacer from the pacing configuration.
    pub fn new(config: &PacingConfig) -> Self {
        Self::with_interval(config.min_interval())
    }

    /// Create a pacer with an explicit minimum interval.
    ///
    /// Sub-millisecond intervals are clamped up to one millisecond.
    pub fn with_interval(interval: Duration) -> Self {
        let period = interval.max(Duration::from_millis(1));
        let quota =
            Quota::with_period(period).unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN));
        debug!(interval_ms = period.as_millis() as u64, "pacer created");
        Self {
            limiter: RateLimiter::direct(quota),
            interval: period,
        }
    }

    /// Block until the budget releases the next call.
    #[instrument(skip(self))]
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// The configured minimum interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
