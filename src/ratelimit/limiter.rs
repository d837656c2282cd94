//! Core rate limiter implementation.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use super::window::WindowStore;
use crate::config::LimiterSettings;

/// Budget for a fixed-window limiter. Immutable for the limiter's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct LimiterConfig {
    /// Window duration
    pub window: Duration,
    /// Maximum requests admitted per window
    pub max_requests: u64,
}

impl From<LimiterSettings> for LimiterConfig {
    fn from(settings: LimiterSettings) -> Self {
        Self {
            window: Duration::from_millis(settings.window_ms),
            max_requests: settings.max_requests,
        }
    }
}

/// A fixed-window rate limiter over one window store.
///
/// Fixed-window counting is cheap and simple, but admits up to twice the
/// configured budget across a boundary straddling two windows. That burst
/// is an accepted tradeoff of the algorithm, not a defect.
///
/// Instances must be shared (one per category, behind an `Arc`) for limits
/// to hold across requests; a limiter reconstructed per request counts
/// nothing.
pub struct FixedWindowLimiter {
    config: LimiterConfig,
    store: WindowStore,
}

impl FixedWindowLimiter {
    /// Create a new limiter with the given budget.
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            config,
            store: WindowStore::new(),
        }
    }

    /// Check and spend one admission slot for `identifier`.
    ///
    /// Every call that does not deny advances the identifier's counter, so
    /// callers must intend to perform the work this admission covers. Not
    /// for speculative checks; use [`info`](Self::info) for those.
    pub fn is_allowed(&self, identifier: &str) -> bool {
        let allowed = self
            .store
            .admit(identifier, self.config.window, self.config.max_requests);

        if !allowed {
            debug!(identifier, "rate limit exceeded");
        }

        allowed
    }

    /// Read-only projection of `identifier`'s current budget.
    ///
    /// A missing or expired record reports the full budget with zero
    /// retry-after.
    pub fn info(&self, identifier: &str) -> AdmissionInfo {
        let now = Utc::now();

        match self.store.snapshot(identifier) {
            Some(record) if now <= record.reset_at => {
                let remaining = self.config.max_requests.saturating_sub(record.count);
                let millis_left = (record.reset_at - now).num_milliseconds().max(0) as u64;

                AdmissionInfo {
                    allowed: remaining > 0,
                    remaining,
                    reset_at: record.reset_at,
                    retry_after_secs: millis_left.div_ceil(1000),
                }
            }
            _ => AdmissionInfo {
                allowed: true,
                remaining: self.config.max_requests,
                reset_at: now,
                retry_after_secs: 0,
            },
        }
    }

    /// The budget this limiter enforces.
    pub fn config(&self) -> LimiterConfig {
        self.config
    }

    /// Drop expired window records. See [`WindowStore::evict_expired`].
    pub fn evict_expired(&self) {
        self.store.evict_expired();
    }

    /// Number of identifiers currently tracked.
    pub fn tracked_identifiers(&self) -> usize {
        self.store.len()
    }

    /// Forget all tracked identifiers.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.store.clear();
    }
}

/// Point-in-time budget projection for one identifier.
#[derive(Debug, Clone)]
pub struct AdmissionInfo {
    /// Whether the next request would be admitted
    pub allowed: bool,
    /// Slots left in the current window
    pub remaining: u64,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
    /// Whole seconds a denied caller should wait before retrying
    pub retry_after_secs: u64,
}

impl AdmissionInfo {
    /// Header pairs for the transport to attach to the outgoing response.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("X-RateLimit-Remaining".to_string(), self.remaining.to_string()),
            (
                "X-RateLimit-Reset".to_string(),
                self.reset_at.timestamp().to_string(),
            ),
            ("Retry-After".to_string(), self.retry_after_secs.to_string()),
        ]
    }
}
