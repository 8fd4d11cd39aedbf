//! Retry integration is handled via a wrapper processor (`RetryProcessor`).
//!
//! The batch runner processes each item exactly once; a caller that wants
//! transient failures retried wraps its processor with [`with_retry`], and the
//! wrapper re-invokes the inner processor according to a [`RetryPolicy`].
use crate::processor::Processor;
use async_trait::async_trait;
use std::time::Duration;

/// Strategy for computing backoff durations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Delay = initial_backoff * attempt_count
    Linear,
    /// Delay = initial_backoff * 2^(attempt_count - 1)
    Exponential,
}

/// Policy controlling retry behavior for processors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: usize,
    /// Initial backoff duration between retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration allowed.
    pub max_backoff: Duration,
    /// Strategy to compute backoff durations.
    pub strategy: BackoffStrategy,
    /// Optional fixed jitter to add to each backoff.
    pub jitter: Option<Duration>,
}

impl RetryPolicy {
    /// Construct a new RetryPolicy.
    pub fn new(
        max_attempts: usize,
        initial_backoff: Duration,
        max_backoff: Duration,
        strategy: BackoffStrategy,
    ) -> Self {
        RetryPolicy {
            max_attempts,
            initial_backoff,
            max_backoff,
            strategy,
            jitter: None,
        }
    }

    /// Specify a fixed jitter offset to add to each backoff.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// Compute the backoff duration before the next retry given the attempt count (1-based).
    pub fn backoff_duration(&self, attempt: usize) -> Duration {
        let base = match self.strategy {
            BackoffStrategy::Linear => self
                .initial_backoff
                .saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX)),
            BackoffStrategy::Exponential => {
                // 2^(attempt-1), saturating at 32 bits
                let exp = attempt.saturating_sub(1);
                let factor = if exp < 32 { 1_u32 << exp } else { u32::MAX };
                self.initial_backoff.saturating_mul(factor)
            }
        };
        let capped = base.min(self.max_backoff);
        match self.jitter {
            Some(j) => capped.saturating_add(j),
            None => capped,
        }
    }
}

/// Wrap an existing processor with retry behavior according to the given policy.
///
/// # Example
///
/// ```rust
/// use batchflow_core::*;
/// use std::time::Duration;
/// // up to 3 attempts, exponential backoff 100ms -> 200ms
/// let policy = RetryPolicy::new(
///     3,
///     Duration::from_millis(100),
///     Duration::from_secs(1),
///     BackoffStrategy::Exponential,
/// );
/// let fetch = |id: u64| async move { Ok::<_, String>(id) };
/// let processor = with_retry(fetch, policy);
/// # let _ = processor;
/// ```
pub fn with_retry<P>(processor: P, policy: RetryPolicy) -> RetryProcessor<P> {
    RetryProcessor::new(processor, policy)
}

/// Wrapper processor that applies a `RetryPolicy` on inner failures.
///
/// The inner processor receives a clone of the item on every attempt. After
/// the last attempt the final error is returned unchanged.
#[derive(Clone, Debug)]
pub struct RetryProcessor<P> {
    /// Inner processor to invoke.
    pub inner: P,
    /// Policy controlling retry attempts and backoff.
    pub policy: RetryPolicy,
}

impl<P> RetryProcessor<P> {
    /// Create a new retry wrapper around `inner` with the given `policy`.
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        RetryProcessor { inner, policy }
    }
}

#[async_trait]
impl<T, P> Processor<T> for RetryProcessor<P>
where
    T: Clone + Send + 'static,
    P: Processor<T>,
{
    type Output = P::Output;
    type Error = P::Error;

    async fn process(&self, item: T) -> Result<P::Output, P::Error> {
        let mut attempt = 1;
        loop {
            let attempt_item = item.clone();
            match self.inner.process(attempt_item).await {
                Ok(out) => return Ok(out),
                Err(e) => {
                    tracing::debug!(
                        attempt,
                        error = %e,
                        "RetryProcessor: caught error, evaluating retry policy"
                    );
                    if !self.policy.should_retry(attempt) {
                        tracing::warn!(
                            attempt,
                            error = %e,
                            "RetryProcessor: giving up after reaching retry limit"
                        );
                        return Err(e);
                    }
                    let backoff = self.policy.backoff_duration(attempt);
                    tracing::debug!(attempt, backoff = ?backoff, "RetryProcessor: retrying after backoff");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
