//! Configuration management for the governance layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration for the governance layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,

    /// Operation timeout configuration
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            rate_limiting: RateLimitingConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Rate limiting configuration: one budget per operation category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Named limiter categories, each with its own budget
    #[serde(default = "default_categories")]
    pub categories: HashMap<String, LimiterSettings>,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

/// Budget for a single limiter category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimiterSettings {
    /// Window duration in milliseconds
    pub window_ms: u64,
    /// Maximum requests admitted per window
    pub max_requests: u64,
}

fn default_categories() -> HashMap<String, LimiterSettings> {
    HashMap::from([
        (
            "auth".to_string(),
            LimiterSettings {
                window_ms: 15 * 60 * 1000,
                max_requests: 20,
            },
        ),
        (
            "mutation".to_string(),
            LimiterSettings {
                window_ms: 60 * 1000,
                max_requests: 60,
            },
        ),
        (
            "search".to_string(),
            LimiterSettings {
                window_ms: 60 * 1000,
                max_requests: 30,
            },
        ),
    ])
}

/// Operation timeout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Deadline applied when no keyword matches the operation name
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Client-visible message for pipeline-injected timeout errors
    #[serde(default = "default_timeout_message")]
    pub message: String,

    /// Whether duration and timeout metrics are emitted
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,

    /// Whether per-request arm/settle debug logs are emitted
    #[serde(default)]
    pub enable_debug_logging: bool,

    /// Keyword to deadline overrides, matched case-insensitively against
    /// the operation name
    #[serde(default = "default_operation_timeouts")]
    pub operation_timeouts_ms: HashMap<String, u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            message: default_timeout_message(),
            enable_metrics: default_enable_metrics(),
            enable_debug_logging: false,
            operation_timeouts_ms: default_operation_timeouts(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_timeout_message() -> String {
    "Request timed out".to_string()
}

fn default_enable_metrics() -> bool {
    true
}

fn default_operation_timeouts() -> HashMap<String, u64> {
    HashMap::from([
        ("upload".to_string(), 120_000),
        ("search".to_string(), 10_000),
        ("report".to_string(), 60_000),
    ])
}

impl GovernanceConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| crate::error::WardenError::Config(e.to_string()))
    }
}
