//! Retry-interval detection from API response headers.
//!
//! Rate limit responses carry a `Retry-After` header with the wait in
//! seconds (fractional values allowed). Header detection is authoritative:
//! it reflects the server's current view of the budget, so the configured
//! fallback applies only when the header is absent or unreadable.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use tracing::debug;

/// Extract the server-supplied retry interval in seconds, if present and
/// non-negative.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<f64> {
    let secs: f64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    (secs >= 0.0).then_some(secs)
}

/// The retry wait for a rate limit response: the server-supplied interval,
/// or `fallback` when the header is missing or unreadable.
pub fn retry_after(headers: &HeaderMap, fallback: Duration) -> Duration {
    match retry_after_secs(headers) {
        Some(secs) => {
            debug!(secs, "retry interval from Retry-After header");
            Duration::from_secs_f64(secs)
        }
        None => {
            debug!(fallback_secs = fallback.as_secs_f64(), "no Retry-After header, using fallback");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_integer_seconds() {
        assert_eq!(retry_after_secs(&headers_with("5")), Some(5.0));
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(retry_after_secs(&headers_with("2.5")), Some(2.5));
    }

    #[test]
    fn test_missing_header_uses_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);
        assert_eq!(
            retry_after(&headers, Duration::from_secs(5)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_garbage_header_uses_fallback() {
        assert_eq!(retry_after_secs(&headers_with("soon")), None);
        assert_eq!(
            retry_after(&headers_with("-3"), Duration::from_secs(5)),
            Duration::from_secs(5)
        );
    }
}
