//! # batchflow-core
//!
//! Bounded-concurrency batch processing over async processors.
//!
//! Items are split into consecutive batches that run one after another. Each
//! batch runs with at most `concurrency` processor calls in flight and an
//! optional pause separates batches. Results always come back in input order.
//!
//! ```rust
//! use batchflow_core::{run_batch, BatchConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let square = |n: u64| async move { Ok::<_, String>(n * n) };
//! let config = BatchConfig::new(4).with_concurrency(2);
//! let squares = run_batch((1..=10_u64).collect(), &square, &config).await.unwrap();
//! assert_eq!(squares[9], 100);
//! # }
//! ```
pub mod config;
pub mod error;
pub mod isolate;
mod limiter;
pub mod outcome;
pub mod processor;
pub mod retry;
pub mod runner;
pub mod timeout;

pub use config::BatchConfig;
pub use error::{BatchError, ItemError, TimeoutError};
pub use isolate::{ErrorHandler, IgnoreErrors, Isolated};
pub use outcome::BatchSummary;
pub use processor::Processor;
pub use retry::{with_retry, BackoffStrategy, RetryPolicy, RetryProcessor};
pub use runner::{run_batch, run_batch_isolated, run_batch_isolated_with, IsolatedResults};
pub use timeout::{with_timeout, TimeoutProcessor};
