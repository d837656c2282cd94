//! Admission guard: translates a limiter's deny decision into a typed
//! failure for resolvers to raise before doing any work.

use tracing::warn;

use super::limiter::FixedWindowLimiter;
use crate::error::{Result, WardenError};

/// Label used in messages and logs when the caller supplies none.
const FALLBACK_LABEL: &str = "request";

/// Check admission for `identifier` against `limiter`.
///
/// Returns normally on admission, after spending a slot. On denial, raises
/// [`WardenError::RateLimitExceeded`] carrying the retry metadata from the
/// identifier's window, and logs a warning (denials are an expected,
/// client-correctable condition).
///
/// `operation_label` is only used for the message and logs; an empty label
/// falls back to a generic one. An empty `identifier` is a valid shared
/// bucket: all callers with no identifiable source collapse onto one
/// counter.
pub fn check_admission(
    limiter: &FixedWindowLimiter,
    identifier: &str,
    operation_label: &str,
) -> Result<()> {
    if limiter.is_allowed(identifier) {
        return Ok(());
    }

    let label = if operation_label.is_empty() {
        FALLBACK_LABEL
    } else {
        operation_label
    };

    let info = limiter.info(identifier);
    warn!(
        identifier,
        operation = label,
        retry_after_secs = info.retry_after_secs,
        reset_at = %info.reset_at,
        "Admission denied"
    );

    Err(WardenError::RateLimitExceeded {
        operation: label.to_string(),
        retry_after_secs: info.retry_after_secs,
        reset_at: info.reset_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::limiter::LimiterConfig;
    use std::time::Duration;

    fn limiter(window_ms: u64, max_requests: u64) -> FixedWindowLimiter {
        FixedWindowLimiter::new(LimiterConfig {
            window: Duration::from_millis(window_ms),
            max_requests,
        })
    }

    #[test]
    fn test_burst_denial_and_recovery() {
        // 3 per second: calls 1-3 pass, call 4 is denied with the label in
        // the message, and the budget returns after the window elapses.
        let limiter = limiter(1000, 3);
        let identifier = "192.168.1.100";

        for _ in 0..3 {
            assert!(check_admission(&limiter, identifier, "SubmitResponse").is_ok());
        }

        let denied = check_admission(&limiter, identifier, "SubmitResponse").unwrap_err();
        assert!(denied.to_string().contains("SubmitResponse"));
        assert_eq!(denied.http_status(), 429);
        match denied {
            WardenError::RateLimitExceeded {
                retry_after_secs, ..
            } => assert!(retry_after_secs >= 1),
            other => panic!("expected RateLimitExceeded, got {other:?}"),
        }

        std::thread::sleep(Duration::from_millis(1100));

        assert!(check_admission(&limiter, identifier, "SubmitResponse").is_ok());
    }

    #[test]
    fn test_empty_label_falls_back() {
        let limiter = limiter(60_000, 1);

        assert!(check_admission(&limiter, "client", "").is_ok());
        let denied = check_admission(&limiter, "client", "").unwrap_err();
        assert!(denied.to_string().contains("request"));
    }

    #[test]
    fn test_denial_carries_reset_metadata() {
        let limiter = limiter(60_000, 1);
        check_admission(&limiter, "client", "Login").unwrap();

        let denied = check_admission(&limiter, "client", "Login").unwrap_err();
        let extensions = denied.extensions();
        assert_eq!(extensions["code"], "RATE_LIMIT_EXCEEDED");
        assert_eq!(extensions["remaining"], 0);
        assert!(extensions["retryAfterSeconds"].as_u64().unwrap() > 0);
    }
}
