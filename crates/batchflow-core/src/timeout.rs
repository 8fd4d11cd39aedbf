//! Per-item timeouts.
//!
//! The runner has no timeout of its own; wrap the processor instead.
use crate::error::TimeoutError;
use crate::processor::Processor;
use async_trait::async_trait;
use std::time::Duration;

/// Bound every call of `processor` by `limit`.
pub fn with_timeout<P>(processor: P, limit: Duration) -> TimeoutProcessor<P> {
    TimeoutProcessor {
        inner: processor,
        limit,
    }
}

/// Wrapper processor failing with [`TimeoutError::Elapsed`] when the inner
/// call does not settle in time. The late call is dropped.
#[derive(Clone, Debug)]
pub struct TimeoutProcessor<P> {
    pub inner: P,
    pub limit: Duration,
}

#[async_trait]
impl<T, P> Processor<T> for TimeoutProcessor<P>
where
    T: Send + 'static,
    P: Processor<T>,
{
    type Output = P::Output;
    type Error = TimeoutError<P::Error>;

    async fn process(&self, item: T) -> Result<P::Output, TimeoutError<P::Error>> {
        match tokio::time::timeout(self.limit, self.inner.process(item)).await {
            Ok(Ok(out)) => Ok(out),
            Ok(Err(e)) => Err(TimeoutError::Inner(e)),
            Err(_) => {
                tracing::debug!(limit = ?self.limit, "processor call timed out");
                Err(TimeoutError::Elapsed(self.limit))
            }
        }
    }
}
