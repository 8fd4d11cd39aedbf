//! Failure isolation for batch runs.
//!
//! [`Isolated`] wraps a processor so that it never fails: the inner error, or
//! a panic raised while processing, is captured as an [`ItemError`] and
//! returned as a normal output. The batch runner therefore keeps going and the
//! captured errors land in the result sequence at their item's index.
use crate::error::ItemError;
use crate::processor::Processor;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use tracing::debug;

/// Observer notified of every captured failure.
pub trait ErrorHandler<E, T>: Send + Sync {
    /// Copy of the item to keep while it is processed, `None` if the
    /// handler never looks at items.
    fn retain(&self, item: &T) -> Option<T>;

    fn handle(&self, error: &ItemError<E>, item: &T);
}

impl<E, T, F> ErrorHandler<E, T> for F
where
    T: Clone,
    F: Fn(&ItemError<E>, &T) + Send + Sync,
{
    fn retain(&self, item: &T) -> Option<T> {
        Some(item.clone())
    }

    fn handle(&self, error: &ItemError<E>, item: &T) {
        (self)(error, item)
    }
}

/// Handler used when the caller does not observe failures.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreErrors;

impl<E, T> ErrorHandler<E, T> for IgnoreErrors {
    fn retain(&self, _item: &T) -> Option<T> {
        None
    }

    fn handle(&self, _error: &ItemError<E>, _item: &T) {}
}

/// Processor adapter that turns failures into [`ItemError`] outputs.
pub struct Isolated<'a, P: ?Sized, H = IgnoreErrors> {
    inner: &'a P,
    on_error: H,
}

impl<'a, P: ?Sized> Isolated<'a, P> {
    /// Isolate failures of `inner` without observing them.
    pub fn new(inner: &'a P) -> Self {
        Isolated {
            inner,
            on_error: IgnoreErrors,
        }
    }
}

impl<'a, P: ?Sized, H> Isolated<'a, P, H> {
    /// Report each captured failure and its item to `handler`.
    pub fn on_error<H2>(self, handler: H2) -> Isolated<'a, P, H2> {
        Isolated {
            inner: self.inner,
            on_error: handler,
        }
    }
}

#[async_trait]
impl<'a, T, P, H> Processor<T> for Isolated<'a, P, H>
where
    T: Send + 'static,
    P: Processor<T> + ?Sized,
    H: ErrorHandler<P::Error, T>,
{
    type Output = Result<P::Output, ItemError<P::Error>>;
    type Error = Infallible;

    async fn process(&self, item: T) -> Result<Self::Output, Infallible> {
        // the item is moved into the processor
        let reported = self.on_error.retain(&item);
        let outcome = AssertUnwindSafe(self.inner.process(item))
            .catch_unwind()
            .await;
        let error = match outcome {
            Ok(Ok(out)) => return Ok(Ok(out)),
            Ok(Err(e)) => ItemError::Failed(e),
            Err(payload) => ItemError::Panicked(panic_message(payload)),
        };
        debug!(error = %error, "captured processor failure");
        if let Some(item) = &reported {
            self.on_error.handle(&error, item);
        }
        Ok(Err(error))
    }
}

/// Normalize a panic payload into a message.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_passes_through_success() {
        let inner = |i: u32| async move { Ok::<_, String>(i + 1) };
        let isolated = Isolated::new(&inner);
        assert_eq!(isolated.process(1_u32).await, Ok(Ok(2)));
    }

    #[tokio::test]
    async fn test_captures_error_and_reports_item() {
        let inner = |i: u32| async move { Err::<u32, _>(format!("no {i}")) };
        let seen = Mutex::new(Vec::new());
        let isolated = Isolated::new(&inner).on_error(|e: &ItemError<String>, item: &u32| {
            seen.lock().unwrap().push((e.to_string(), *item))
        });
        assert_eq!(
            isolated.process(9_u32).await,
            Ok(Err(ItemError::Failed("no 9".to_string())))
        );
        assert_eq!(*seen.lock().unwrap(), vec![("no 9".to_string(), 9)]);
    }

    #[tokio::test]
    async fn test_normalizes_panics() {
        let inner = |i: u32| async move {
            if i == 0 {
                panic!("division by zero");
            }
            Ok::<_, String>(100 / i)
        };
        let isolated = Isolated::new(&inner);
        assert_eq!(
            isolated.process(0_u32).await,
            Ok(Err(ItemError::Panicked("division by zero".to_string())))
        );
        assert_eq!(isolated.process(4_u32).await, Ok(Ok(25)));
    }

    // not Clone
    #[derive(Debug, PartialEq)]
    struct Upload {
        bytes: Vec<u8>,
    }

    #[tokio::test]
    async fn test_unobserved_isolation_accepts_non_clone_items() {
        let inner = |upload: Upload| async move {
            if upload.bytes.is_empty() {
                Err("empty upload".to_string())
            } else {
                Ok(upload.bytes.len())
            }
        };
        let isolated = Isolated::new(&inner);
        assert_eq!(
            isolated.process(Upload { bytes: vec![1, 2, 3] }).await,
            Ok(Ok(3))
        );
        assert_eq!(
            isolated.process(Upload { bytes: Vec::new() }).await,
            Ok(Err(ItemError::Failed("empty upload".to_string())))
        );
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "unknown panic payload");
    }
}
