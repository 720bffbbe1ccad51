use std::time::Duration;

use tokio::time::sleep;

use crate::error::CoreError;

// ============================================================================
// Bounded Retry with Exponential Backoff
// ============================================================================
//
// Transient failures (version conflicts, timeouts, store outages) are retried
// up to a bounded attempt count with growing delays. Everything else surfaces
// on the first failure.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap on the delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier applied after each attempt.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No backoff delay; keeps tests fast.
    #[cfg(test)]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }
}

/// Run `operation`, retrying while it fails with a transient [`CoreError`].
///
/// Non-transient errors and the final transient failure propagate unchanged.
pub async fn retry_transient<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &'static str,
    mut operation: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, CoreError>>,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(
                        operation = operation_name,
                        attempt,
                        "operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(error) if error.is_transient() && attempt < config.max_attempts => {
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "transient failure, retrying after delay"
                );

                sleep(delay).await;

                delay = Duration::from_millis(
                    ((delay.as_millis() as f64) * config.multiplier) as u64,
                );
                delay = delay.min(config.max_delay);
            }
            Err(error) => {
                tracing::error!(
                    operation = operation_name,
                    attempt,
                    error = %error,
                    "operation failed"
                );
                return Err(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn recovers_from_transient_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_transient(&RetryConfig::immediate(3), "test op", || {
            let counter = counter_clone.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(CoreError::StoreUnavailable("flaky".into()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), _> = retry_transient(&RetryConfig::immediate(3), "test op", || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::Timeout { operation: "get" })
            }
        })
        .await;

        assert!(matches!(result, Err(CoreError::Timeout { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), _> = retry_transient(&RetryConfig::immediate(3), "test op", || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::validation("bad input"))
            }
        })
        .await;

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
