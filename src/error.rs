//! Error types for the warden governance layer.
//!
//! Both governance failures are terminal: they propagate to the transport
//! boundary unchanged, are never retried here, and carry enough metadata for
//! the client to decide whether and when to retry.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use thiserror::Error;

/// Main error type for governance operations.
#[derive(Error, Debug)]
pub enum WardenError {
    /// An identifier exhausted its request budget for a limiter category.
    /// Expected, client-correctable condition.
    #[error("Rate limit exceeded for {operation}. Try again in {retry_after_secs} seconds")]
    RateLimitExceeded {
        /// Label of the operation that was denied admission
        operation: String,
        /// Seconds until the current window resets
        retry_after_secs: u64,
        /// When the current window resets
        reset_at: DateTime<Utc>,
    },

    /// A caller-level deadline fired before the wrapped operation settled.
    #[error("Operation timeout after {timeout_ms}ms")]
    OperationTimeout {
        /// The deadline that was exceeded, in milliseconds
        timeout_ms: u64,
    },

    /// The pipeline-level timer fired before the response was sent.
    #[error("{operation} exceeded the {timeout_ms}ms deadline after {duration_ms}ms")]
    RequestTimeout {
        /// Name of the operation that overran its deadline
        operation: String,
        /// How long the operation had been running when the timer fired
        duration_ms: u64,
        /// The configured deadline, in milliseconds
        timeout_ms: u64,
        /// When the timer fired
        timestamp: DateTime<Utc>,
    },

    /// A limiter category that was never registered.
    #[error("Unknown limiter category: {0}")]
    UnknownLimiter(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WardenError {
    /// Machine-readable error code surfaced in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            WardenError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            WardenError::OperationTimeout { .. } => "OPERATION_TIMEOUT",
            WardenError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            WardenError::UnknownLimiter(_) | WardenError::Config(_) | WardenError::Io(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// HTTP status the transport should map this error to.
    pub fn http_status(&self) -> u16 {
        match self {
            WardenError::RateLimitExceeded { .. } => 429,
            WardenError::OperationTimeout { .. } | WardenError::RequestTimeout { .. } => 408,
            WardenError::UnknownLimiter(_) | WardenError::Config(_) | WardenError::Io(_) => 500,
        }
    }

    /// GraphQL-style extensions object for this error.
    pub fn extensions(&self) -> Value {
        let mut extensions = json!({
            "code": self.code(),
            "httpStatus": self.http_status(),
        });

        match self {
            WardenError::RateLimitExceeded {
                retry_after_secs,
                reset_at,
                ..
            } => {
                extensions["retryAfterSeconds"] = json!(retry_after_secs);
                extensions["remaining"] = json!(0);
                extensions["resetAt"] = json!(reset_at.to_rfc3339());
            }
            WardenError::OperationTimeout { timeout_ms } => {
                extensions["timeoutMs"] = json!(timeout_ms);
            }
            WardenError::RequestTimeout {
                operation,
                duration_ms,
                timeout_ms,
                timestamp,
            } => {
                extensions["operation"] = json!(operation);
                extensions["durationMs"] = json!(duration_ms);
                extensions["timeoutMs"] = json!(timeout_ms);
                extensions["timestamp"] = json!(timestamp.to_rfc3339());
            }
            _ => {}
        }

        extensions
    }

    /// Render this error in the shape GraphQL responses carry errors in.
    pub fn to_graphql_error(&self) -> Value {
        json!({
            "message": self.to_string(),
            "extensions": self.extensions(),
        })
    }
}

/// Result type alias for governance operations.
pub type Result<T> = std::result::Result<T, WardenError>;
