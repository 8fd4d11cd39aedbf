//! Batch runner entry points.
//!
//! A run splits its input into consecutive batches of `batch_size` items and
//! processes them strictly one after another. Inside a batch at most
//! `concurrency` processor calls are in flight at any time. Between batches
//! the runner optionally sleeps for `delay`; no pause follows the last batch.
//!
//! [`run_batch`] aborts on the first failure. [`run_batch_isolated`] and
//! [`run_batch_isolated_with`] capture each failure in the result sequence
//! instead, so every item is attempted.
use crate::config::BatchConfig;
use crate::error::{BatchError, ItemError};
use crate::isolate::Isolated;
use crate::limiter::run_limited;
use crate::processor::Processor;
use std::convert::Infallible;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// Results of an isolated run: one entry per input item, in input order.
pub type IsolatedResults<O, E> = Vec<Result<O, ItemError<E>>>;

/// Process every item with bounded concurrency, failing fast.
///
/// Returns one output per item in input order. The first processor failure
/// observed aborts the run with [`BatchError::Processor`]; calls still in
/// flight in that batch are dropped and no further batch is started.
pub async fn run_batch<T, P>(
    items: Vec<T>,
    processor: &P,
    config: &BatchConfig,
) -> Result<Vec<P::Output>, BatchError<P::Error>>
where
    T: Send + 'static,
    P: Processor<T> + ?Sized,
{
    config.validate::<P::Error>()?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let span = info_span!(
        "batch_run",
        run_id = %Uuid::new_v4(),
        items = items.len(),
        batch_size = config.batch_size,
        concurrency = config.effective_concurrency(),
    );
    run_batches(items, processor, config).instrument(span).await
}

async fn run_batches<T, P>(
    items: Vec<T>,
    processor: &P,
    config: &BatchConfig,
) -> Result<Vec<P::Output>, BatchError<P::Error>>
where
    T: Send + 'static,
    P: Processor<T> + ?Sized,
{
    let total = items.len();
    let batch_size = config.batch_size;
    let concurrency = config.effective_concurrency();
    let batch_count = total.div_ceil(batch_size);

    let mut remaining = items.into_iter();
    let mut results = Vec::with_capacity(total);
    for batch_index in 0..batch_count {
        let batch: Vec<T> = remaining.by_ref().take(batch_size).collect();
        let size = batch.len();
        debug!(batch = batch_index, size, "starting batch");

        let outputs = run_limited(processor, batch, batch_index * batch_size, concurrency)
            .await
            .inspect_err(|e| {
                if let BatchError::Processor { index, source } = e {
                    warn!(
                        batch = batch_index,
                        index,
                        error = %source,
                        "aborting run on processor failure"
                    );
                }
            })?;
        results.extend(outputs);
        debug!(batch = batch_index, size, "batch complete");

        if !config.delay.is_zero() && batch_index + 1 < batch_count {
            debug!(delay = ?config.delay, "pausing before next batch");
            tokio::time::sleep(config.delay).await;
        }
    }
    Ok(results)
}

/// Process every item with bounded concurrency, capturing failures per item.
///
/// Never returns a processor failure as `Err`; the only error is an invalid
/// configuration. Panics inside the processor are captured as
/// [`ItemError::Panicked`]. Items need not be `Clone`.
pub async fn run_batch_isolated<T, P>(
    items: Vec<T>,
    processor: &P,
    config: &BatchConfig,
) -> Result<IsolatedResults<P::Output, P::Error>, BatchError<Infallible>>
where
    T: Send + 'static,
    P: Processor<T> + ?Sized,
{
    let isolated = Isolated::new(processor);
    run_batch(items, &isolated, config).await
}

/// Like [`run_batch_isolated`], reporting each failure to `on_error`.
///
/// `on_error` receives the captured error and the failing item as soon as the
/// failure is observed, in settlement order. It must not panic. Each item is
/// cloned before processing so it can be reported after the processor took it.
pub async fn run_batch_isolated_with<T, P, H>(
    items: Vec<T>,
    processor: &P,
    config: &BatchConfig,
    on_error: H,
) -> Result<IsolatedResults<P::Output, P::Error>, BatchError<Infallible>>
where
    T: Clone + Send + 'static,
    P: Processor<T> + ?Sized,
    H: Fn(&ItemError<P::Error>, &T) + Send + Sync,
{
    let isolated = Isolated::new(processor).on_error(on_error);
    run_batch(items, &isolated, config).await
}
