//! Named limiter registry: one independently configured limiter per
//! operation category.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::guard;
use super::limiter::{AdmissionInfo, FixedWindowLimiter, LimiterConfig};
use crate::config::RateLimitingConfig;
use crate::error::{Result, WardenError};

/// A set of named [`FixedWindowLimiter`] instances, each with its own
/// budget.
///
/// Built once by the host's composition root and shared across requests;
/// categories exhaust independently even for the same identifier.
pub struct LimiterRegistry {
    limiters: HashMap<String, Arc<FixedWindowLimiter>>,
}

impl LimiterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            limiters: HashMap::new(),
        }
    }

    /// Build a registry with one limiter per configured category.
    pub fn from_config(config: &RateLimitingConfig) -> Self {
        let mut registry = Self::new();

        for (name, settings) in &config.categories {
            info!(
                category = %name,
                window_ms = settings.window_ms,
                max_requests = settings.max_requests,
                "Registering limiter category"
            );
            registry.register(name, LimiterConfig::from(*settings));
        }

        registry
    }

    /// Add a limiter for `category`, replacing any existing one.
    pub fn register(&mut self, category: &str, config: LimiterConfig) {
        self.limiters
            .insert(category.to_string(), Arc::new(FixedWindowLimiter::new(config)));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_limiter(mut self, category: &str, config: LimiterConfig) -> Self {
        self.register(category, config);
        self
    }

    /// Look up the limiter for `category`.
    pub fn get(&self, category: &str) -> Option<Arc<FixedWindowLimiter>> {
        self.limiters.get(category).cloned()
    }

    /// Registered category names.
    pub fn categories(&self) -> Vec<&str> {
        self.limiters.keys().map(String::as_str).collect()
    }

    /// Check admission for `identifier` against the named category.
    ///
    /// See [`guard::check_admission`] for denial semantics.
    pub fn check_admission(
        &self,
        category: &str,
        identifier: &str,
        operation_label: &str,
    ) -> Result<()> {
        guard::check_admission(self.require(category)?, identifier, operation_label)
    }

    /// Read-only budget projection for `identifier` in the named category.
    pub fn admission_info(&self, category: &str, identifier: &str) -> Result<AdmissionInfo> {
        Ok(self.require(category)?.info(identifier))
    }

    fn require(&self, category: &str) -> Result<&FixedWindowLimiter> {
        self.limiters
            .get(category)
            .map(Arc::as_ref)
            .ok_or_else(|| WardenError::UnknownLimiter(category.to_string()))
    }
}

impl Default for LimiterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_config_registers_default_categories() {
        let registry = LimiterRegistry::from_config(&RateLimitingConfig::default());

        assert!(registry.get("auth").is_some());
        assert!(registry.get("mutation").is_some());
        assert!(registry.get("search").is_some());
        assert!(registry.get("payments").is_none());
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let registry = LimiterRegistry::new();

        let result = registry.check_admission("payments", "client", "Checkout");
        assert!(matches!(result, Err(WardenError::UnknownLimiter(ref c)) if c == "payments"));

        assert!(registry.admission_info("payments", "client").is_err());
    }

    #[test]
    fn test_categories_exhaust_independently() {
        // Exhausting "auth" must not block "search" for the same identifier.
        let registry = LimiterRegistry::new()
            .with_limiter(
                "auth",
                LimiterConfig {
                    window: Duration::from_secs(15 * 60),
                    max_requests: 20,
                },
            )
            .with_limiter(
                "search",
                LimiterConfig {
                    window: Duration::from_secs(60),
                    max_requests: 30,
                },
            );

        let identifier = "203.0.113.7";
        for _ in 0..20 {
            assert!(registry.check_admission("auth", identifier, "Login").is_ok());
        }
        assert!(registry.check_admission("auth", identifier, "Login").is_err());

        for _ in 0..30 {
            assert!(registry
                .check_admission("search", identifier, "SearchSurveys")
                .is_ok());
        }
        assert!(registry
            .check_admission("search", identifier, "SearchSurveys")
            .is_err());
    }

    #[test]
    fn test_register_replaces_existing_limiter() {
        let mut registry = LimiterRegistry::new();
        registry.register(
            "auth",
            LimiterConfig {
                window: Duration::from_secs(60),
                max_requests: 1,
            },
        );
        assert!(registry.check_admission("auth", "client", "Login").is_ok());
        assert!(registry.check_admission("auth", "client", "Login").is_err());

        registry.register(
            "auth",
            LimiterConfig {
                window: Duration::from_secs(60),
                max_requests: 2,
            },
        );
        assert!(registry.check_admission("auth", "client", "Login").is_ok());
    }
}
