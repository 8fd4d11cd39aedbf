//! Run configuration for the batch runner.

use crate::error::BatchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of items in one batch.
    pub batch_size: usize,
    /// Maximum number of in-flight processor calls within a batch.
    /// Defaults to `batch_size` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    /// Pause between consecutive batches. Never applied after the last batch.
    #[serde(default, rename = "delay_ms", with = "duration_ms")]
    pub delay: Duration,
}

impl BatchConfig {
    /// Create a configuration with the given batch size, full concurrency and no delay.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            concurrency: None,
            delay: Duration::ZERO,
        }
    }

    /// Cap the number of in-flight processor calls per batch.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set the pause inserted between batches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The concurrency bound actually applied to each batch.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or(self.batch_size)
    }

    /// Reject configurations that cannot make progress.
    pub fn validate<E>(&self) -> Result<(), BatchError<E>> {
        if self.batch_size == 0 {
            return Err(BatchError::invalid_config("batch_size must be at least 1"));
        }
        if self.concurrency == Some(0) {
            return Err(BatchError::invalid_config("concurrency must be at least 1"));
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::new(8);
        assert_eq!(config.effective_concurrency(), 8);
        assert_eq!(config.delay, Duration::ZERO);
        assert!(config.validate::<String>().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BatchConfig::new(10)
            .with_concurrency(3)
            .with_delay(Duration::from_millis(250));
        assert_eq!(config.effective_concurrency(), 3);
        assert_eq!(config.delay, Duration::from_millis(250));
    }

    #[test]
    fn test_validate_rejects_zero() {
        let err = BatchConfig::new(0).validate::<String>().unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));

        let err = BatchConfig::new(4)
            .with_concurrency(0)
            .validate::<String>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid batch configuration: concurrency must be at least 1"
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: BatchConfig =
            serde_json::from_str(r#"{"batch_size": 5, "concurrency": 2, "delay_ms": 100}"#)
                .unwrap();
        assert_eq!(
            config,
            BatchConfig::new(5)
                .with_concurrency(2)
                .with_delay(Duration::from_millis(100))
        );

        // concurrency and delay are optional
        let config: BatchConfig = serde_json::from_str(r#"{"batch_size": 3}"#).unwrap();
        assert_eq!(config, BatchConfig::new(3));
    }

    #[test]
    fn test_serialize_omits_unset_concurrency() {
        let json = serde_json::to_value(BatchConfig::new(4).with_delay(Duration::from_secs(1)))
            .unwrap();
        assert_eq!(json, serde_json::json!({"batch_size": 4, "delay_ms": 1000}));
    }
}
