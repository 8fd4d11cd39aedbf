use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;

/// An asynchronous operation applied to every item of a batch run.
///
/// Any `Fn(T) -> impl Future<Output = Result<O, E>>` closure is a processor,
/// so most callers never implement this trait by hand. The closure's future
/// must be `'static`: capture owned or `Arc` values in it. A processor that
/// borrows from the caller's scope is written as a struct holding the
/// reference and implementing this trait, since its future only borrows
/// `&self`.
#[async_trait]
pub trait Processor<T: Send + 'static>: Send + Sync {
    /// Value produced for one item
    type Output: Send + 'static;
    /// Error produced when one item fails
    type Error: Display + Send + 'static;

    /// Process one item.
    async fn process(&self, item: T) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<T, F, Fut, O, E> Processor<T> for F
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    O: Send + 'static,
    E: Display + Send + 'static,
{
    type Output = O;
    type Error = E;

    async fn process(&self, item: T) -> Result<O, E> {
        (self)(item).await
    }
}
