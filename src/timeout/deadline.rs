//! Deadline racer: an operation raced against a competing timer.

use std::future::Future;
use std::time::Duration;

use crate::error::{Result, WardenError};

/// Race `operation` against a timer; whichever settles first wins.
///
/// The operation runs as a detached task. If the timer fires first the call
/// returns [`WardenError::OperationTimeout`], but the operation is not
/// cancelled: it keeps running in the background and its eventual result is
/// discarded. True cancellation would require a cooperative token threaded
/// through the operation itself, which this layer does not provide. If the
/// operation settles first, the timer future is dropped with the race, so
/// no armed timer outlives the call.
pub async fn with_deadline<F, T>(operation: F, timeout: Duration) -> Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut operation = tokio::spawn(operation);

    tokio::select! {
        joined = &mut operation => match joined {
            Ok(value) => Ok(value),
            // The handle is never aborted, so a join error is a panic in
            // the operation; hand it back to the caller's panic machinery.
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        },
        _ = tokio::time::sleep(timeout) => {
            Err(WardenError::OperationTimeout {
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// A reusable deadline that wraps any async unit of work.
///
/// The combinator form of [`with_deadline`]: construct once at resolver
/// registration time, apply to each call.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    timeout: Duration,
}

impl Deadline {
    /// Create a deadline with the given duration.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Create a deadline from milliseconds.
    pub fn from_millis(timeout_ms: u64) -> Self {
        Self::new(Duration::from_millis(timeout_ms))
    }

    /// The wrapped duration.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `operation` under this deadline.
    pub async fn run<F, T>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        with_deadline(operation, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio_test::assert_ok;

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_wins_the_race() {
        let result = with_deadline(
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                42
            },
            Duration::from_millis(1000),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_operation_times_out() {
        let result = with_deadline(
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                42
            },
            Duration::from_millis(100),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Operation timeout after 100ms");
        assert_eq!(err.http_status(), 408);
        match err {
            WardenError::OperationTimeout { timeout_ms } => assert_eq!(timeout_ms, 100),
            other => panic!("expected OperationTimeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_operation_keeps_running() {
        // Timing out only changes what the caller observes; the operation
        // still completes in the background.
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let result = with_deadline(
            async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                flag.store(true, Ordering::SeqCst);
            },
            Duration::from_millis(50),
        )
        .await;

        assert!(result.is_err());
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_error_passes_through() {
        // The racer only injects its own failure on timeout; an operation's
        // own Result comes back intact.
        let result = with_deadline(
            async { Err::<u32, String>("boom".to_string()) },
            Duration::from_millis(1000),
        )
        .await;

        assert_eq!(result.unwrap(), Err("boom".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_combinator() {
        let deadline = Deadline::from_millis(100);
        assert_eq!(deadline.timeout(), Duration::from_millis(100));

        let value = assert_ok!(deadline.run(async { "done" }).await);
        assert_eq!(value, "done");

        let err = deadline
            .run(async {
                tokio::time::sleep(Duration::from_millis(500)).await;
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Operation timeout after 100ms");
    }
}
