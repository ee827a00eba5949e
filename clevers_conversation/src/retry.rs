use std::future::Future;
use std::time::Duration;

use clevers_core::{Error, Result};
use tokio::time::sleep;
use tracing::warn;

/// Attempts per logical call when the service returns malformed JSON:
/// the first try plus one retry.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Bound on how often a malformed reply is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
        }
    }

    /// Pause between attempts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Run `operation` until it yields something other than a transient error.
///
/// Only [`Error::MalformedReply`] is retried. Every other error is returned
/// on the attempt that produced it. When the policy is exhausted the last
/// parse error is wrapped in [`Error::ExhaustedRetries`].
pub async fn retry_transient<F, Fut, T>(policy: RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(Error::MalformedReply(source)) => {
                if attempt >= max_attempts {
                    return Err(Error::ExhaustedRetries {
                        attempts: attempt,
                        source,
                    });
                }
                warn!(
                    "Malformed reply (attempt {}/{}): {source}. Retrying...",
                    attempt, max_attempts
                );
                if !policy.delay.is_zero() {
                    sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clevers_core::ServiceError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn malformed() -> Error {
        Error::MalformedReply(serde_json::from_str::<serde_json::Value>("{\"out").unwrap_err())
    }

    #[tokio::test]
    async fn retry_succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let result = retry_transient(RetryPolicy::default(), |_| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(())
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_malformed_reply() {
        let result = retry_transient(RetryPolicy::new(3), |attempt| async move {
            if attempt < 3 { Err(malformed()) } else { Ok(attempt) }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let result: Result<()> = retry_transient(RetryPolicy::new(4), |_| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(malformed())
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(Error::ExhaustedRetries { attempts: 4, .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn non_transient_errors_are_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let result: Result<()> = retry_transient(RetryPolicy::new(5), |_| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(Error::Service(ServiceError::InvalidApiKey))
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(Error::Service(ServiceError::InvalidApiKey))
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts() {
        let policy = RetryPolicy::new(2).with_delay(Duration::from_secs(5));
        let started = tokio::time::Instant::now();
        let result: Result<()> = retry_transient(policy, |_| async { Err(malformed()) }).await;
        assert!(result.is_err());
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }
}
