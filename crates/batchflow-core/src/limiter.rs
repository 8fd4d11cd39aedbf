//! Bounded-concurrency execution of a single batch.
//!
//! All in-flight calls are polled from the caller's task through one
//! `FuturesUnordered` pool. The pool never holds more than `limit` futures;
//! as soon as any of them settles its slot is handed to the next item.
use crate::error::BatchError;
use crate::processor::Processor;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::trace;

/// Run `processor` over `batch` with at most `limit` calls in flight.
///
/// `base_index` is the input position of the batch's first item and is used
/// to report failures. Outputs are returned in batch order. The first failure
/// observed is returned and every call still in flight is dropped.
pub(crate) async fn run_limited<T, P>(
    processor: &P,
    batch: Vec<T>,
    base_index: usize,
    limit: usize,
) -> Result<Vec<P::Output>, BatchError<P::Error>>
where
    T: Send + 'static,
    P: Processor<T> + ?Sized,
{
    let len = batch.len();
    if len == 0 {
        return Ok(Vec::new());
    }
    let limit = limit.clamp(1, len);

    let mut slots: Vec<Option<P::Output>> = Vec::with_capacity(len);
    slots.resize_with(len, || None);

    let admit = |offset: usize, item: T| {
        trace!(index = base_index + offset, "admitting item");
        processor.process(item).map(move |res| (offset, res))
    };

    let mut pending = FuturesUnordered::new();
    for (offset, item) in batch.into_iter().enumerate() {
        if pending.len() >= limit {
            if let Some((done, res)) = pending.next().await {
                settle(&mut slots, base_index, done, res)?;
            }
        }
        pending.push(admit(offset, item));
    }
    while let Some((done, res)) = pending.next().await {
        settle(&mut slots, base_index, done, res)?;
    }

    let outputs: Vec<P::Output> = slots.into_iter().flatten().collect();
    debug_assert_eq!(outputs.len(), len);
    Ok(outputs)
}

fn settle<O, E>(
    slots: &mut [Option<O>],
    base_index: usize,
    offset: usize,
    res: Result<O, E>,
) -> Result<(), BatchError<E>> {
    match res {
        Ok(out) => {
            slots[offset] = Some(out);
            Ok(())
        }
        Err(source) => Err(BatchError::Processor {
            index: base_index + offset,
            source,
        }),
    }
}
