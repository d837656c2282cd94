//! Per-operation deadline resolution via keyword lookup.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::TimeoutConfig;

/// Maps an operation name to its deadline.
///
/// Each configured keyword is matched as a case-insensitive substring of
/// the operation name; the first match wins. The backing map's iteration
/// order is arbitrary, so overlapping keywords resolve nondeterministically;
/// keep keywords disjoint. A missing or unmatched name gets the default.
#[derive(Debug, Clone)]
pub struct TimeoutResolver {
    default_timeout: Duration,
    keyword_timeouts: HashMap<String, Duration>,
}

impl TimeoutResolver {
    /// Create a resolver from a default and keyword overrides.
    pub fn new(default_timeout: Duration, keyword_timeouts: HashMap<String, Duration>) -> Self {
        // Keywords are lowercased once here so resolve only lowercases the
        // operation name.
        let keyword_timeouts = keyword_timeouts
            .into_iter()
            .map(|(keyword, timeout)| (keyword.to_lowercase(), timeout))
            .collect();

        Self {
            default_timeout,
            keyword_timeouts,
        }
    }

    /// Build a resolver from the timeout configuration.
    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self::new(
            Duration::from_millis(config.default_timeout_ms),
            config
                .operation_timeouts_ms
                .iter()
                .map(|(keyword, ms)| (keyword.clone(), Duration::from_millis(*ms)))
                .collect(),
        )
    }

    /// Resolve the deadline for a (possibly anonymous) operation name.
    pub fn resolve(&self, operation_name: Option<&str>) -> Duration {
        let Some(name) = operation_name else {
            return self.default_timeout;
        };
        let name = name.to_lowercase();

        self.keyword_timeouts
            .iter()
            .find(|(keyword, _)| name.contains(keyword.as_str()))
            .map(|(_, timeout)| *timeout)
            .unwrap_or(self.default_timeout)
    }

    /// The fallback deadline.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
