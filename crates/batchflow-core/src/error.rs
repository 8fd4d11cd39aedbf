use std::time::Duration;
use thiserror::Error;

/// Errors returned by a batch run.
///
/// `E` is the error type of the processor driving the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError<E> {
    /// The run configuration was rejected before any item was processed.
    #[error("Invalid batch configuration: {0}")]
    InvalidConfig(String),
    /// The processor failed on the item at `index` (position in the input).
    #[error("Processor failed on item {index}: {source}")]
    Processor {
        index: usize,
        #[source]
        source: E,
    },
}

impl<E> BatchError<E> {
    /// Shorthand for an [`BatchError::InvalidConfig`] error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        BatchError::InvalidConfig(msg.into())
    }

    /// Returns the processor error, if this is one.
    pub fn into_processor_error(self) -> Option<E> {
        match self {
            BatchError::Processor { source, .. } => Some(source),
            BatchError::InvalidConfig(_) => None,
        }
    }
}

/// A failure captured by an isolated run in place of an item's output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError<E> {
    /// The processor returned an error; it is kept unchanged.
    #[error(transparent)]
    Failed(E),
    /// The processor panicked. The payload is kept as a string.
    #[error("Processor panicked: {0}")]
    Panicked(String),
}

impl<E> ItemError<E> {
    /// Returns the processor's own error, if the item did not panic.
    pub fn as_failed(&self) -> Option<&E> {
        match self {
            ItemError::Failed(e) => Some(e),
            ItemError::Panicked(_) => None,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, ItemError::Panicked(_))
    }
}

/// Error produced by a processor wrapped with [`crate::with_timeout`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeoutError<E> {
    /// The inner processor did not settle within the given duration.
    #[error("Processor timed out after {0:?}")]
    Elapsed(Duration),
    /// The inner processor settled with an error in time.
    #[error(transparent)]
    Inner(E),
}
