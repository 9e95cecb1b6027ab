//! Bounded retry with exponential backoff for outbound calls.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::errors::DigestError;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub attempts: usize,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            attempts: 0,
            base_delay_ms: 0,
        }
    }

    /// Delays of `base`, `2*base`, `4*base`... capped and jittered.
    fn delays(self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor((self.base_delay_ms / 2).max(1))
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            base_delay_ms: 200,
        }
    }
}

/// Run `operation`, retrying only while the error is transient.
pub async fn with_retry<F, Fut, T>(
    policy: RetryPolicy,
    label: &str,
    operation: F,
) -> Result<T, DigestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DigestError>>,
{
    RetryIf::spawn(policy.delays(), operation, |e: &DigestError| {
        let transient = e.is_transient();
        if transient {
            warn!(operation = label, error = %e, "Transient failure");
        }
        transient
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(attempts: usize) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = with_retry(fast(3), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DigestError::backend(Some(503), "unavailable"))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(fast(3), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DigestError::backend(Some(401), "bad key"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(fast(2), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DigestError::fetch("https://example.com", None, "connection reset"))
        })
        .await;

        assert!(matches!(result, Err(DigestError::FetchError { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_policy_calls_once() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let _: Result<(), _> = with_retry(RetryPolicy::none(), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DigestError::backend(None, "timeout"))
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
