//! Lifecycle plugin: arms a deadline when the operation is identified and
//! settles it when the response is about to be sent.
//!
//! The timer is advisory at the transport boundary. When it fires, only the
//! client-visible response is replaced; the resolver work underneath keeps
//! running to completion, exactly as with
//! [`with_deadline`](crate::timeout::with_deadline).

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::context::{OperationResponse, RequestContext};
use crate::config::TimeoutConfig;
use crate::error::WardenError;
use crate::observability::MetricsSink;
use crate::timeout::TimeoutResolver;

const METRIC_TIMEOUT_EXCEEDED: &str = "governance.request.timeout_exceeded";
const METRIC_REQUEST_DURATION: &str = "governance.request.duration_ms";

/// Hooks the governance deadlines into the request pipeline.
///
/// One plugin instance serves every request; per-request state lives in the
/// [`PendingOperation`] returned by
/// [`operation_identified`](Self::operation_identified).
pub struct LifecyclePlugin {
    resolver: TimeoutResolver,
    metrics: Arc<dyn MetricsSink>,
    message: String,
    enable_metrics: bool,
    enable_debug_logging: bool,
}

impl LifecyclePlugin {
    /// Create a plugin from the timeout configuration and a metrics sink.
    pub fn new(config: TimeoutConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            resolver: TimeoutResolver::from_config(&config),
            metrics,
            message: config.message,
            enable_metrics: config.enable_metrics,
            enable_debug_logging: config.enable_debug_logging,
        }
    }

    /// "Operation identified" hook: resolve the deadline for the (possibly
    /// anonymous) operation, record the start time, and arm the timer.
    ///
    /// If the timer fires while the returned value is still armed, it logs
    /// the overrun with full request context, emits the timeout-exceeded
    /// metric, and deposits a [`WardenError::RequestTimeout`] for
    /// [`response_ready`](Self::response_ready) to inject.
    pub fn operation_identified(&self, ctx: &RequestContext) -> PendingOperation {
        let operation = ctx.operation_label().to_string();
        let timeout = self.resolver.resolve(ctx.operation_name.as_deref());
        let started_at = Instant::now();

        if self.enable_debug_logging {
            debug!(
                operation = %operation,
                timeout_ms = timeout.as_millis() as u64,
                "Deadline armed"
            );
        }

        let verdict: Arc<Mutex<Option<WardenError>>> = Arc::new(Mutex::new(None));

        let timer = {
            let verdict = Arc::clone(&verdict);
            let metrics = Arc::clone(&self.metrics);
            let enable_metrics = self.enable_metrics;
            let operation = operation.clone();
            let variables = ctx.variables.clone();
            let user_id = ctx.user_id.clone();

            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;

                let duration_ms = started_at.elapsed().as_millis() as u64;
                let timeout_ms = timeout.as_millis() as u64;

                error!(
                    operation = %operation,
                    variables = ?variables,
                    user_id = ?user_id,
                    duration_ms,
                    timeout_ms,
                    "Request exceeded its deadline"
                );

                if enable_metrics {
                    metrics.increment(
                        METRIC_TIMEOUT_EXCEEDED,
                        &[("operation", operation.as_str())],
                    );
                }

                *verdict.lock() = Some(WardenError::RequestTimeout {
                    operation,
                    duration_ms,
                    timeout_ms,
                    timestamp: Utc::now(),
                });
            })
        };

        PendingOperation {
            operation,
            started_at,
            timeout,
            timer,
            verdict,
        }
    }

    /// "Response about to be sent" hook: settle the race.
    ///
    /// Clears the timer if it is still armed. If it already fired, the
    /// response's data and errors are overwritten with the deposited
    /// timeout failure; otherwise the response passes through untouched and
    /// the request's duration and outcome are recorded. Consuming the
    /// [`PendingOperation`] is what makes both settled states terminal.
    pub fn response_ready(&self, pending: PendingOperation, response: &mut OperationResponse) {
        match pending.settle() {
            Some(timeout_error) => {
                let mut graphql_error = timeout_error.to_graphql_error();
                graphql_error["message"] = serde_json::Value::String(self.message.clone());

                response.data = None;
                response.errors = vec![graphql_error];
            }
            None => {
                let duration_ms = pending.elapsed().as_millis() as u64;

                if self.enable_debug_logging {
                    debug!(
                        operation = %pending.operation,
                        duration_ms,
                        "Deadline cleared"
                    );
                }

                if self.enable_metrics {
                    let outcome = if response.has_errors() { "error" } else { "success" };
                    self.metrics.timing(
                        METRIC_REQUEST_DURATION,
                        duration_ms,
                        &[("operation", pending.operation.as_str()), ("outcome", outcome)],
                    );
                }
            }
        }
    }
}

/// Per-request timer state.
///
/// Created armed by the "operation identified" hook and consumed by the
/// "response about to be sent" hook. Ownership encodes the request's state
/// machine: an armed value either settles normally or times out, and once
/// settled it is gone, so there is no path back to armed.
#[derive(Debug)]
pub struct PendingOperation {
    operation: String,
    started_at: Instant,
    timeout: Duration,
    timer: JoinHandle<()>,
    verdict: Arc<Mutex<Option<WardenError>>>,
}

impl PendingOperation {
    /// The operation label this timer covers.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The deadline the timer was armed with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time elapsed since the operation was identified.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Cancel the timer if still armed and take the verdict if it already
    /// fired.
    fn settle(&self) -> Option<WardenError> {
        self.timer.abort();
        self.verdict.lock().take()
    }
}

impl Drop for PendingOperation {
    fn drop(&mut self) {
        // Hosts that drop a request without reaching the response hook must
        // not leave a timer running.
        self.timer.abort();
    }
}
