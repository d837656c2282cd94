//! Observability seams: logging setup and the metrics sink.

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{FacadeMetrics, MetricsSink, NoopMetrics};

#[cfg(test)]
pub(crate) use metrics::testing;
