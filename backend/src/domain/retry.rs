//! Conflict-retry coordinator.
//!
//! The backing store offers no cross-row locking, so racing writers are
//! detected after the fact as uniqueness or compare-and-set conflicts. This
//! module is the single retry wrapper both the ticket number generator and
//! the lifecycle manager use: conflicts are retried up to a bound with
//! growing backoff, anything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Classifies errors into retryable conflicts and everything else.
pub trait ConflictClass {
    /// True when the error is a transient uniqueness or compare-and-set
    /// conflict worth retrying.
    fn is_conflict(&self) -> bool;
}

/// Bounded retry with per-attempt backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Multiplied by the attempt number, plus a little jitter.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    fn backoff(&self, attempt: u32, rng: &mut SmallRng) -> Duration {
        let jitter = Duration::from_millis(rng.gen_range(0..25));
        self.base_delay * attempt + jitter
    }
}

/// Run `op` until it succeeds, fails with a non-conflict error, or the
/// attempt budget is exhausted. The closure receives the 1-based attempt
/// number.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: ConflictClass,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut rng = SmallRng::from_entropy();
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_conflict() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt, &mut rng);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "conflict, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Conflict,
        Fatal,
    }

    impl ConflictClass for TestError {
        fn is_conflict(&self) -> bool {
            matches!(self, Self::Conflict)
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn conflicts_are_retried_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = with_retry(fast_policy(), move |_| {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(TestError::Conflict)
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_conflict_errors_propagate_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retry(fast_policy(), move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Fatal)
            }
        })
        .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_budget_returns_the_last_conflict() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retry(fast_policy(), move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Conflict)
            }
        })
        .await;

        assert_eq!(result, Err(TestError::Conflict));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn attempt_numbers_are_one_based() {
        let result = with_retry(fast_policy(), |attempt| async move {
            if attempt < 2 {
                Err(TestError::Conflict)
            } else {
                Ok(attempt)
            }
        })
        .await;

        assert_eq!(result, Ok(2));
    }
}
