//! Fixed-delay retry around remote calls.
//!
//! Remote reads are smoothed over transient failures (rate limiting, 5xx,
//! dropped connections) by re-issuing them a bounded number of times with a
//! constant pause. Only read-only or idempotent operations may be wrapped.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};

use crate::platform::short_error_message;
use crate::sync::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, ProgressCallback, SyncProgress, emit};

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Pause between attempts. Constant, no jitter.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Build the backon strategy for this policy.
    ///
    /// backon counts retries, not attempts; a policy of zero attempts still
    /// runs the operation once.
    #[must_use]
    pub fn to_backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Run `operation`, retrying every failure according to `policy`.
///
/// The last error is returned unchanged once attempts are exhausted. Each
/// retry is logged and reported as [`SyncProgress::Retrying`].
///
/// # Example
///
/// ```ignore
/// let page = execute_with_retry(
///     &RetryPolicy::default(),
///     || client.list_pull_requests("o", "r", 1, 100),
///     "list pull requests",
///     None,
/// )
/// .await?;
/// ```
pub async fn execute_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
    label: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error,
{
    let attempt = AtomicU32::new(0);

    let counted = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    counted
        .retry(policy.to_backoff())
        .notify(|err: &E, dur: Duration| {
            let failed_attempt = attempt.load(Ordering::SeqCst);
            let error = short_error_message(err);
            tracing::warn!(
                operation = label,
                attempt = failed_attempt,
                max_attempts = policy.max_attempts,
                retry_in_ms = dur.as_millis() as u64,
                error = %error,
                "Remote call failed, retrying"
            );
            emit(
                on_progress,
                SyncProgress::Retrying {
                    operation: label.to_string(),
                    attempt: failed_attempt,
                    delay_ms: dur.as_millis() as u64,
                    error,
                },
            );
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct TestError(&'static str);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for TestError {}

    #[test]
    fn default_policy_is_three_attempts_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let events: Arc<Mutex<Vec<SyncProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let events_capture = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            events_capture
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        });

        let calls_capture = Arc::clone(&calls);
        let operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                let n = calls_capture.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError("transient"))
                } else {
                    Ok(42u32)
                }
            }
        };

        let started = tokio::time::Instant::now();
        let result =
            execute_with_retry(&RetryPolicy::default(), operation, "test", Some(&callback)).await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two fixed pauses, no growth and no jitter.
        assert_eq!(started.elapsed(), Duration::from_secs(2));

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        let attempts: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                SyncProgress::Retrying { attempt, .. } => Some(*attempt),
                _ => None,
            })
            .collect();
        assert_eq!(attempts, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn propagates_last_error_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);
        let operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                let n = calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(if n == 2 {
                    TestError("third")
                } else {
                    TestError("earlier")
                })
            }
        };

        let err = execute_with_retry(&RetryPolicy::default(), operation, "test", None)
            .await
            .expect_err("all attempts fail");

        assert_eq!(err, TestError("third"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);
        let operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError("boom"))
            }
        };

        let policy = RetryPolicy::new(1, Duration::from_millis(10));
        let result = execute_with_retry(&policy, operation, "test", None).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
