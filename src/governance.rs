//! Composition root for the governance layer.

use std::sync::Arc;

use crate::config::GovernanceConfig;
use crate::observability::{FacadeMetrics, MetricsSink, NoopMetrics};
use crate::pipeline::LifecyclePlugin;
use crate::ratelimit::LimiterRegistry;

/// The governance layer as a host service composes it: a limiter registry
/// and a lifecycle plugin built from one configuration.
///
/// Constructed once at startup and threaded through request context, so
/// limiter lifetimes and test isolation stay explicit; there are no
/// import-time singletons anywhere in this crate.
pub struct Governance {
    registry: LimiterRegistry,
    plugin: LifecyclePlugin,
}

impl Governance {
    /// Build from configuration with the default metrics sink.
    ///
    /// Metrics go to the `metrics` facade when enabled and are discarded
    /// otherwise.
    pub fn from_config(config: GovernanceConfig) -> Self {
        let metrics: Arc<dyn MetricsSink> = if config.timeouts.enable_metrics {
            Arc::new(FacadeMetrics)
        } else {
            Arc::new(NoopMetrics)
        };
        Self::with_metrics(config, metrics)
    }

    /// Build from configuration with an injected metrics sink.
    pub fn with_metrics(config: GovernanceConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            registry: LimiterRegistry::from_config(&config.rate_limiting),
            plugin: LifecyclePlugin::new(config.timeouts, metrics),
        }
    }

    /// The named limiters resolvers check admission against.
    pub fn registry(&self) -> &LimiterRegistry {
        &self.registry
    }

    /// The lifecycle plugin the request pipeline hooks into.
    pub fn plugin(&self) -> &LifecyclePlugin {
        &self.plugin
    }
}
