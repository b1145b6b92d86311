//! Fixed-delay retry of fallible async operations.
//!
//! Used for the source fetch and for every variant store. Transforms and
//! planning are never retried.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use resizer_core::constants::{RETRY_ATTEMPTS, RETRY_DELAY};

/// Fixed attempt count and fixed delay, no backoff growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: RETRY_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        retry_with_fixed_delay(self.attempts, self.delay, operation).await
    }

    /// Like [`RetryPolicy::run`], but an error for which `retryable` returns
    /// false is returned at once.
    pub async fn run_if<T, E, F, Fut, P>(&self, operation: F, retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        retry_with_fixed_delay_if(self.attempts, self.delay, operation, retryable).await
    }
}

/// Run `operation` up to `attempts` times (at least once), sleeping `delay`
/// between attempts. Returns the first success, or the last error unchanged.
pub async fn retry_with_fixed_delay<T, E, F, Fut>(
    attempts: u32,
    delay: Duration,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_fixed_delay_if(attempts, delay, operation, |_| true).await
}

/// [`retry_with_fixed_delay`] that stops at the first error `retryable`
/// rejects.
pub async fn retry_with_fixed_delay_if<T, E, F, Fut, P>(
    attempts: u32,
    delay: Duration,
    mut operation: F,
    retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) if !retryable(&e) => {
                tracing::debug!(attempt, error = %e, "Error is not retryable");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    const SHORT: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let calls = &AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_fixed_delay(3, SHORT, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fails_twice_then_succeeds() {
        let calls = &AtomicU32::new(0);
        let result: Result<&str, String> = retry_with_fixed_delay(3, SHORT, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(format!("failure {}", n))
            } else {
                Ok("stored")
            }
        })
        .await;

        assert_eq!(result, Ok("stored"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_verbatim() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), String> = retry_with_fixed_delay(3, SHORT, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err(format!("failure {}", n))
        })
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), &str> = retry_with_fixed_delay(0, SHORT, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("nope")
        })
        .await;

        assert_eq!(result, Err("nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fixed_delay_between_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let start = Instant::now();
        let result: Result<(), &str> = policy.run(move || async move { Err("down") }).await;

        assert!(result.is_err());
        // Two sleeps between three attempts
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), String> = retry_with_fixed_delay_if(
            3,
            Duration::from_secs(10),
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("invalid key".to_string())
            },
            |e: &String| !e.starts_with("invalid"),
        )
        .await;

        assert_eq!(result, Err("invalid key".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_if_retries_transient_errors() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(3, SHORT);
        let result: Result<u32, String> = policy
            .run_if(
                move || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 2 {
                        Err("timeout".to_string())
                    } else {
                        Ok(n)
                    }
                },
                |e: &String| e == "timeout",
            )
            .await;

        assert_eq!(result, Ok(2));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(500));
    }
}
