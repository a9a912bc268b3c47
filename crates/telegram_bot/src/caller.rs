//! Retry wrapper for outbound Telegram calls.
//!
//! Every call to the platform goes through [`Caller::call`], which classifies
//! failures and either drops the call, honors a mandated rate-limit wait, or
//! retries with exponential backoff. The wrapper never surfaces an error:
//! callers get `Some(value)` or `None` and must treat `None` as a normal
//! outcome so the rest of the batch keeps flowing.

use std::{fmt, future::IntoFuture, time::Duration};

use teloxide::{ApiError, RequestError};

/// What the retry loop should do with a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    /// The recipient is permanently unreachable (blocked, chat gone).
    /// Abandon the call without retrying.
    Gone,
    /// The platform mandated a wait before the same call may be repeated.
    /// Does not consume the retry budget.
    RetryAfter(Duration),
    /// Network trouble or a timeout; retried with backoff.
    Transient,
    /// Any other platform-reported error; retried like a transient failure
    /// but logged at error severity on every occurrence.
    Other,
}

pub(crate) trait ClassifyError: fmt::Display {
    fn classify(&self) -> ErrorClass;
}

impl ClassifyError for RequestError {
    fn classify(&self) -> ErrorClass {
        match self {
            RequestError::Api(
                ApiError::BotBlocked
                | ApiError::BotKicked
                | ApiError::ChatNotFound
                | ApiError::UserDeactivated,
            ) => ErrorClass::Gone,
            RequestError::RetryAfter(seconds) => ErrorClass::RetryAfter(seconds.duration()),
            RequestError::Network(_) | RequestError::Io(_) => ErrorClass::Transient,
            _ => ErrorClass::Other,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the `attempt`-th failure (1-based):
    /// `min(base_delay * 2^(attempt - 1), max_delay)`.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Caller {
    policy: RetryPolicy,
}

impl Caller {
    pub(crate) fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Executes `call`, absorbing transient failures per the retry policy.
    ///
    /// `name` labels log lines. The closure is re-invoked for every attempt,
    /// so the call must be safe to rebuild.
    pub(crate) async fn call<T, E, F, Fut>(&self, name: &str, mut call: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: IntoFuture<Output = Result<T, E>>,
        E: ClassifyError,
    {
        let mut attempts = 0u32;
        loop {
            let err = match call().await {
                Ok(value) => return Some(value),
                Err(err) => err,
            };

            match err.classify() {
                ErrorClass::Gone => {
                    tracing::debug!("{name}: recipient unreachable, dropping call: {err}");
                    return None;
                }
                ErrorClass::RetryAfter(wait) => {
                    tracing::warn!("{name}: rate limited, waiting {}s", wait.as_secs());
                    tokio::time::sleep(wait).await;
                }
                ErrorClass::Transient => {
                    attempts += 1;
                    if attempts >= self.policy.max_attempts {
                        tracing::error!("{name}: giving up after {attempts} attempts: {err}");
                        return None;
                    }
                    let delay = self.policy.backoff(attempts);
                    tracing::warn!(
                        "{name}: transient failure, retry {attempts}/{max} in {}s: {err}",
                        delay.as_secs(),
                        max = self.policy.max_attempts,
                    );
                    tokio::time::sleep(delay).await;
                }
                ErrorClass::Other => {
                    attempts += 1;
                    tracing::error!("{name}: telegram error (attempt {attempts}): {err}");
                    if attempts >= self.policy.max_attempts {
                        return None;
                    }
                    tokio::time::sleep(self.policy.backoff(attempts)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum FakeError {
        #[error("recipient gone")]
        Gone,
        #[error("rate limited")]
        RateLimited(Duration),
        #[error("network down")]
        Network,
        #[error("server broke")]
        Server,
    }

    impl ClassifyError for FakeError {
        fn classify(&self) -> ErrorClass {
            match self {
                FakeError::Gone => ErrorClass::Gone,
                FakeError::RateLimited(wait) => ErrorClass::RetryAfter(*wait),
                FakeError::Network => ErrorClass::Transient,
                FakeError::Server => ErrorClass::Other,
            }
        }
    }

    type Script = Arc<Mutex<Vec<Result<u32, FakeError>>>>;

    fn script(results: Vec<Result<u32, FakeError>>) -> Script {
        Arc::new(Mutex::new(results))
    }

    async fn run(caller: Caller, script: &Script) -> Option<u32> {
        caller
            .call("test", || {
                let script = script.clone();
                async move { script.lock().unwrap().remove(0) }
            })
            .await
    }

    #[tokio::test]
    async fn success_passes_through() {
        let script = script(vec![Ok(7)]);
        assert_eq!(run(Caller::default(), &script).await, Some(7));
        assert!(script.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn gone_recipient_is_dropped_without_retry() {
        let start = tokio::time::Instant::now();
        let script = script(vec![Err(FakeError::Gone), Ok(7)]);

        assert_eq!(run(Caller::default(), &script).await, None);
        // No sleep, no second attempt.
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(script.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_waits_the_mandated_duration_then_retries() {
        let start = tokio::time::Instant::now();
        let script = script(vec![
            Err(FakeError::RateLimited(Duration::from_secs(3))),
            Ok(42),
        ]);

        assert_eq!(run(Caller::default(), &script).await, Some(42));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_does_not_consume_retry_budget() {
        let mut results: Vec<Result<u32, FakeError>> = (0..10)
            .map(|_| Err(FakeError::RateLimited(Duration::from_secs(1))))
            .collect();
        results.push(Ok(1));
        let script = script(results);

        assert_eq!(run(Caller::default(), &script).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_back_off_exponentially() {
        let start = tokio::time::Instant::now();
        let script = script(vec![Err(FakeError::Network), Err(FakeError::Network), Ok(9)]);

        assert_eq!(run(Caller::default(), &script).await, Some(9));
        // 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_budget_exhaustion_returns_none() {
        let start = tokio::time::Instant::now();
        let script = script((0..5).map(|_| Err(FakeError::Network)).collect());

        assert_eq!(run(Caller::default(), &script).await, None);
        // Four sleeps (1 + 2 + 4 + 8); the fifth failure gives up.
        assert_eq!(start.elapsed(), Duration::from_secs(15));
        assert!(script.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_share_the_transient_budget() {
        let script = script((0..5).map(|_| Err(FakeError::Server)).collect());
        assert_eq!(run(Caller::default(), &script).await, None);
        assert!(script.lock().unwrap().is_empty());
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(8));
        assert_eq!(policy.backoff(6), Duration::from_secs(30));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(30));
    }
}
