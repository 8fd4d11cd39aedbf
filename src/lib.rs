//! # Batchflow - bounded-concurrency batch processing for async Rust
//!
//! This crate runs an async processor over a list of items in sequential
//! batches, capping how many calls are in flight and optionally pausing
//! between batches. It is a facade over [`batchflow_core`].
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! batchflow = "0.3"
//! ```
//!
//! ```rust
//! use batchflow::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let lookup = |id: u32| async move { Ok::<_, String>(format!("user-{id}")) };
//! let config = BatchConfig::new(50)
//!     .with_concurrency(5)
//!     .with_delay(Duration::from_millis(10));
//! let users = run_batch((1..=120_u32).collect(), &lookup, &config).await.unwrap();
//! assert_eq!(users.len(), 120);
//! # }
//! ```

/// Initialize logging with default settings.
///
/// Installs a `tracing_subscriber` fmt subscriber so that run, batch and
/// retry events are printed.
pub fn init() {
    tracing_subscriber::fmt::init();
}

// Re-export the core crate
pub use batchflow_core as core;

/// Everything needed to configure and drive a batch run.
pub mod prelude {
    pub use batchflow_core::{
        run_batch, run_batch_isolated, run_batch_isolated_with, with_retry, with_timeout,
        BackoffStrategy, BatchConfig, BatchError, BatchSummary, ItemError, Processor,
        RetryPolicy, TimeoutError,
    };
}
